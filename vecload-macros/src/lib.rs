use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Proc macro to denote a Transaction
///
/// Every call is timed and counted as a success or an error in the run statistics, under the
/// name of the function. Only works on `async fn`s returning a `Result<T, E>`.
///
/// # Example
/// ```ignore
/// use vecload::prelude::*;
///
/// #[transaction]
/// async fn my_transaction(client: &reqwest::Client) -> Result<(), reqwest::Error> {
///     client.get("http://localhost:8080/health").send().await?.error_for_status()?;
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn transaction(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    transaction_internal(attr.into(), input).into()
}

fn transaction_internal(attr: TokenStream2, input: ItemFn) -> TokenStream2 {
    if !attr.is_empty() {
        return syn::Error::new_spanned(attr, "#[transaction] takes no arguments")
            .to_compile_error();
    }

    if input.sig.asyncness.is_none() {
        return syn::Error::new_spanned(input.sig.fn_token, "#[transaction] requires an async fn")
            .to_compile_error();
    }

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;
    let stmts = &block.stmts;
    let name = &sig.ident;

    quote! {
        #(#attrs)* #vis #sig {
            ::vecload::transaction::transaction_hook(
                ::vecload::generate_labels!(#name),
                async move {
                    #(#stmts)*
                },
            )
            .await
        }
    }
}
