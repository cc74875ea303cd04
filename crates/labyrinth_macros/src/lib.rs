use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Time a function when the `perf_stats` feature is enabled.
///
/// The body is wrapped in a guard that logs through Bevy's `info!` when the
/// call takes longer than the threshold. Systems that take a
/// `tick: Res<MoveTick>` parameter additionally log every 100 movement ticks.
/// Without `perf_stats` the guard is compiled out and the arguments are not
/// evaluated.
///
/// ```ignore
/// #[profile]          // 1 ms threshold
/// pub fn build_tile_graph(/* ... */) { /* ... */ }
///
/// #[profile(5)]       // 5 ms threshold
/// pub fn process_path_requests(/* ... */) { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        attr.to_string().parse().unwrap_or(1)
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let has_tick_param = sig.inputs.iter().any(|arg| {
        let FnArg::Typed(pat_type) = arg else {
            return false;
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return false;
        };
        if pat_ident.ident != "tick" {
            return false;
        }
        let ty = &pat_type.ty;
        quote!(#ty).to_string().contains("MoveTick")
    });

    let guard_fields = if has_tick_param {
        quote! { tick_value: u64, }
    } else {
        quote! {}
    };
    let guard_init = if has_tick_param {
        quote! { tick_value: tick.0, }
    } else {
        quote! {}
    };
    let periodic = if has_tick_param {
        quote! { || self.tick_value % 100 == 0 }
    } else {
        quote! {}
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                struct ProfileGuard {
                    name: &'static str,
                    start: std::time::Instant,
                    #guard_fields
                }
                impl Drop for ProfileGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        if elapsed.as_millis() > #threshold_ms #periodic {
                            bevy::prelude::info!("[PERF] {}: {:?}", self.name, elapsed);
                        }
                    }
                }
                ProfileGuard {
                    name: #fn_name_str,
                    start: std::time::Instant::now(),
                    #guard_init
                }
            };

            #block
        }
    };

    output.into()
}
