use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Reformat a snippet of JavaScript with `oxc_codegen`.
///
/// Anonymous function expressions are not valid statements, so a snippet that fails to parse on
/// its own is retried wrapped in parentheses. Returns `None` if neither form parses.
pub fn pretty_print(snippet: &str) -> Option<String> {
    if let Some(code) = codegen(snippet) {
        return Some(code);
    }
    let wrapped = format!("({snippet});");
    codegen(&wrapped)
}

fn codegen(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !parsed.errors.is_empty() || parsed.panicked {
        return None;
    }
    let code = Codegen::new().build(&parsed.program).code;
    Some(code.trim_end().to_string())
}
