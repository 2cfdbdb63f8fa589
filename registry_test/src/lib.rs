use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Turn a function into a unit test, set up test logging, and inject fixtures.
///
/// Injectable dependencies are a fresh `crate::registry::VotingRegistry`
/// owned by the fixed owner identity, and `crate::testing::Signers`.
///
/// With `#[registry_test(seeded)]` the registry is pre-loaded with the four
/// candidates from `crate::testing::CANDIDATE_NAMES` and with `acc1` to `acc4`
/// registered as voters. Voting is not started.
#[proc_macro_attribute]
pub fn registry_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the arguments to inject and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the body so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_body", name);
    item_fn.sig.ident = new_name.clone();

    // Seed the registry if asked to.
    let maybe_seed = match parse_macro_input!(args as Option<Ident>) {
        None => quote! {},
        Some(arg) if arg == "seeded" => quote! {
            for name in crate::testing::CANDIDATE_NAMES {
                registry.add_candidate(signers.owner, name).unwrap();
            }
            for voter in [signers.acc1, signers.acc2, signers.acc3, signers.acc4] {
                registry.add_voter(signers.owner, voter).unwrap();
            }
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `seeded` or no argument")
                .into_compile_error()
                .into();
        }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        #[allow(unused_mut, unused_variables)]
        fn #name() {
            log4rs_test_utils::test_logging::init_logging_once_for(
                ["simple_voting"],
                None,
                None,
            );

            let signers = crate::testing::Signers::new();
            let mut registry = crate::registry::VotingRegistry::new(signers.owner);

            #maybe_seed

            /// The test itself.
            #item_fn

            #new_name(#(#test_args),*);
        }
    }
    .into()
}

/// Ensure the wrapped test is synchronous and extract the fixtures to inject.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "Registry tests are synchronous; remove `async`",
        ));
    }

    let mut has_registry = false;
    let mut has_signers = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        if type_ident == "VotingRegistry" {
                            if has_registry {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `VotingRegistry`",
                                ));
                            }
                            has_registry = true;
                            args.push(quote! { registry });
                            continue;
                        } else if type_ident == "Signers" {
                            if has_signers {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `Signers`",
                                ));
                            }
                            has_signers = true;
                            args.push(quote! { signers });
                            continue;
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `registry_ident: VotingRegistry` or `signers_ident: Signers`",
        ));
    }

    Ok(args)
}
