//! Integration tests for `url(...)` rewriting.

use scopify_modules::{Mode, Options, transform};

/// Tags every url with the scope it was rewritten in, including characters
/// that need escaping.
fn tagging_options() -> Options {
    Options::new().with_rewrite_url(|global, url| {
        let mode = if global { "global" } else { "local" };
        format!("({mode}){url}\"{mode}\"")
    })
}

fn rewrite(css: &str) -> String {
    transform(css, &tagging_options()).unwrap()
}

#[test]
fn test_unquoted_url() {
    assert_eq!(
        rewrite(".a { background: url(./image.png); }"),
        ":local(.a) { background: url((local\\)./image.png\\\"local\\\"); }"
    );
}

#[test]
fn test_global_rule_url() {
    assert_eq!(
        rewrite(":global .b { background: url(./image.png); }"),
        ".b { background: url((global\\)./image.png\\\"global\\\"); }"
    );
}

#[test]
fn test_double_quoted_url() {
    assert_eq!(
        rewrite(".a { background: url(\"./image.png\"); }"),
        ":local(.a) { background: url(\"(local)./image.png\\\"local\\\"\"); }"
    );
}

#[test]
fn test_single_quoted_url() {
    assert_eq!(
        rewrite(".a { background: url('./image.png'); }"),
        ":local(.a) { background: url('(local)./image.png\"local\"'); }"
    );
}

#[test]
fn test_urls_inside_other_functions() {
    assert_eq!(
        rewrite(".a { background: -webkit-image-set(url(\"./image.png\") 1x, url('./image2x.png') 2x); }"),
        ":local(.a) { background: -webkit-image-set(url(\"(local)./image.png\\\"local\\\"\") 1x, url('(local)./image2x.png\"local\"') 2x); }"
    );
}

#[test]
fn test_urls_in_var_are_skipped() {
    assert_eq!(
        rewrite(".a { background: var(--bg, url(x.png)); }"),
        ":local(.a) { background: var(--bg, url(x.png)); }"
    );
}

#[test]
fn test_font_face_urls_are_local() {
    assert_eq!(
        rewrite("@font-face { src: url(\"./font.woff\"); }"),
        "@font-face { src: url(\"(local)./font.woff\\\"local\\\"\"); }"
    );
}

#[test]
fn test_font_face_urls_in_global_mode() {
    let options = tagging_options().with_mode(Mode::Global);
    assert_eq!(
        transform("@font-face { src: url('./font.woff'); }", &options).unwrap(),
        "@font-face { src: url('(global)./font.woff\"global\"'); }"
    );
}

#[test]
fn test_global_keyframes_urls() {
    assert_eq!(
        rewrite("@keyframes :global(ani1) { 0% { background: url(\"./image.png\"); } }"),
        "@keyframes ani1 { 0% { background: url(\"(global)./image.png\\\"global\\\"\"); } }"
    );
}

#[test]
fn test_local_keyframes_urls() {
    assert_eq!(
        rewrite("@keyframes ani2 { 0% { background: url(\"./image.png\"); } }"),
        "@keyframes :local(ani2) { 0% { background: url(\"(local)./image.png\\\"local\\\"\"); } }"
    );
}

#[test]
fn test_function_ending_in_url_is_untouched() {
    assert_eq!(
        rewrite(".a { background: end-with-url(something); }"),
        ":local(.a) { background: end-with-url(something); }"
    );
}

#[test]
fn test_scope_at_rule_urls() {
    assert_eq!(
        rewrite("@scope (.a) { .b { background: url('./x.png'); } }"),
        "@scope (:local(.a)) { :local(.b) { background: url('(local)./x.png\"local\"'); } }"
    );
}

#[test]
fn test_urls_unchanged_without_rewriter() {
    let css = ".a { background: url(./image.png); }";
    assert_eq!(
        transform(css, &Options::new()).unwrap(),
        ":local(.a) { background: url(./image.png); }"
    );
}
