/// Names a transaction is recorded under, both in the run statistics and in `metrics`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransactionLabels {
    pub name: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

#[macro_export]
macro_rules! generate_labels {
    ($base_name:ident) => {
        ::vecload::TransactionLabels {
            name: stringify!($base_name),
            success: concat!(stringify!($base_name), "_success"),
            error: concat!(stringify!($base_name), "_error"),
            latency: concat!(stringify!($base_name), "_latency"),
        }
    };
}
