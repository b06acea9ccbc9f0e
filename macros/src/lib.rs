use proc_macro::TokenStream;
use quote::quote;
use syn::{Ident, ItemFn, LitStr, parse_macro_input, spanned::Spanned};

/// Marks a synchronous test and routes `tracing` output to the test writer.
///
/// `#[rxfanout_macro::test]` uses the `RUST_LOG` filter (default `warn`);
/// `#[rxfanout_macro::test(debug)]` or `#[rxfanout_macro::test("trace")]`
/// forces a level for that test.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  if input.sig.asyncness.is_some() {
    return TokenStream::from(
      syn::Error::new(
        input.sig.span(),
        "rxfanout_macro::test only supports sync tests: join blocks the calling thread.",
      )
      .to_compile_error(),
    );
  }

  let raw_args = proc_macro2::TokenStream::from(attr);
  let level = if raw_args.is_empty() {
    None
  } else if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
    Some((ident.to_string(), ident.span()))
  } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
    Some((lit.value(), lit.span()))
  } else {
    return TokenStream::from(
      syn::Error::new(
        raw_args.span(),
        "rxfanout_macro::test only accepts: #[rxfanout_macro::test] or \
         #[rxfanout_macro::test(level)]",
      )
      .to_compile_error(),
    );
  };

  let filter = match level {
    None => quote!(
      ::tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| ::tracing_subscriber::EnvFilter::new("warn"))
    ),
    Some((level, span)) => match level.as_str() {
      "error" | "warn" | "info" | "debug" | "trace" => {
        quote!(::tracing_subscriber::EnvFilter::new(#level))
      }
      _ => {
        return TokenStream::from(
          syn::Error::new(
            span,
            "rxfanout_macro::test level must be one of: error, warn, info, debug, trace",
          )
          .to_compile_error(),
        );
      }
    },
  };

  let attrs = &input.attrs;
  let vis = &input.vis;
  let sig = &input.sig;
  let block = &input.block;

  let expanded = quote! {
      #[test]
      #(#attrs)*
      #vis #sig {
        let _ = ::tracing_subscriber::fmt()
          .with_env_filter(#filter)
          .with_test_writer()
          .try_init();
        #block
      }
  };

  TokenStream::from(expanded)
}
