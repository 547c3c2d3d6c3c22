use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Marks an async function as the scheduler entry point.
///
/// This attribute transforms an `async fn main` into a synchronous
/// entry point that:
///
/// 1. Builds a [`Scheduler`] with the default hooks
/// 2. Wraps the function body into a root task
/// 3. Starts the root task and calls `run_all`
///
/// An error propagated out of the body with `?` reaches the default
/// fatal sink, which reports it and terminates.
///
/// # Example
///
/// ```ignore
/// #[metronome::main]
/// async fn main() {
///     delay(3).await;
///     println!("woke at tick {}", current_tick());
/// }
/// ```
///
/// # Notes
///
/// - The `async` keyword is removed from the function signature.
/// - The function body becomes the body of a root task.
#[proc_macro_attribute]
pub fn main(_attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(item) {
        Ok(tokens) => tokens,
        Err(message) => error(message),
    }
}

/// Marks an async function as a test executed on a fresh scheduler.
///
/// This attribute:
/// - removes the `async` keyword,
/// - wraps the function body into a root task on its own scheduler,
/// - automatically adds `#[test]`.
///
/// Assertion failures inside the body unwind out of `run_all` and fail
/// the test; so does an error propagated to the root with `?`, via the
/// default fatal sink.
///
/// Tests that need to observe idle iterations or capture fatal errors
/// should build a `Scheduler::with_hooks` by hand instead of using
/// this attribute.
///
/// # Example
///
/// ```ignore
/// #[metronome::test]
/// async fn advances_the_clock() {
///     let before = current_tick();
///     delay(2).await;
///     assert_eq!(current_tick(), before + 3);
/// }
/// ```
#[proc_macro_attribute]
pub fn test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let expanded = match expand(item) {
        Ok(tokens) => tokens,
        Err(message) => return error(message),
    };

    let test_attr: TokenStream = "#[test]".parse().unwrap();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(expanded);

    result.into_iter().collect()
}

/// Rewrites `async fn name() { body }` into a synchronous function that
/// runs `body` as a root task on a fresh scheduler.
fn expand(item: TokenStream) -> Result<TokenStream, &'static str> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let async_pos = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"));

    match async_pos {
        Some(pos) => {
            tokens.remove(pos);
        }
        None => return Err("this function must be declared async"),
    }

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return Err("expected a function body");
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let new_block = format!(
        "{{
            let scheduler = ::metronome::Scheduler::new();
            let root = ::metronome::RootTask::new(async move {{
                {{ {} }};
                ::core::result::Result::Ok(())
            }});
            root.start(&scheduler);
            scheduler.run_all();
        }}",
        block
    );

    let new_block = new_block
        .parse()
        .map_err(|_| "failed to re-parse the function body")?;

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, new_block));

    Ok(tokens.into_iter().collect())
}

/// Expands to a `compile_error!` carrying `message`.
fn error(message: &str) -> TokenStream {
    format!("compile_error!(\"{}\");", message).parse().unwrap()
}
