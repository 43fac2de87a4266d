//! Swift source emitter for generated spies.

use std::fmt::Write;

use crate::core::{
    AccessLevel, Expr, FunctionSignature, GeneratedDeclaration, GeneratedSpy, GenericParameter,
    Parameter, SemanticType, Statement, SubscriptSignature,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Renders a type in Swift syntax.
pub fn render_type(ty: &SemanticType) -> String {
    match ty {
        SemanticType::Named { name } => name.clone(),
        SemanticType::GenericPlaceholder { name } => name.clone(),
        SemanticType::MemberType { base, member } => format!("{}.{}", render_type(base), member),
        SemanticType::ErasedAny => "Any".to_string(),
        SemanticType::Optional { wrapped } => format!("{}?", render_postfix_operand(wrapped)),
        SemanticType::ImplicitlyUnwrapped { wrapped } => {
            format!("{}!", render_postfix_operand(wrapped))
        }
        SemanticType::Array { element } => format!("[{}]", render_type(element)),
        SemanticType::Dictionary { key, value } => {
            format!("[{}: {}]", render_type(key), render_type(value))
        }
        SemanticType::Tuple { elements } => {
            let inner: Vec<String> = elements
                .iter()
                .map(|e| match &e.label {
                    Some(label) => format!("{}: {}", label, render_type(&e.ty)),
                    None => render_type(&e.ty),
                })
                .collect();
            format!("({})", inner.join(", "))
        }
        SemanticType::Applied { name, arguments } => {
            let args: Vec<String> = arguments.iter().map(render_type).collect();
            format!("{}<{}>", name, args.join(", "))
        }
        SemanticType::Function {
            params,
            is_async,
            is_throwing,
            returns,
        } => {
            let params: Vec<String> = params.iter().map(render_type).collect();
            format!(
                "({}){}{} -> {}",
                params.join(", "),
                if *is_async { " async" } else { "" },
                if *is_throwing { " throws" } else { "" },
                render_type(returns)
            )
        }
    }
}

/// `?` and `!` bind tighter than function arrows and existential keywords.
fn render_postfix_operand(ty: &SemanticType) -> String {
    let rendered = render_type(ty);
    let needs_parens = match ty {
        SemanticType::Function { .. } => true,
        SemanticType::Named { name } => name.contains(' '),
        _ => false,
    };
    if needs_parens {
        format!("({})", rendered)
    } else {
        rendered
    }
}

pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Identifier { name } => name.clone(),
        Expr::IntLiteral { value } => value.to_string(),
        Expr::EmptyArray => "[]".to_string(),
        Expr::Tuple { elements } => {
            let inner: Vec<String> = elements
                .iter()
                .map(|(label, value)| format!("{}: {}", label, render_expr(value)))
                .collect();
            format!("({})", inner.join(", "))
        }
        Expr::Greater { lhs, rhs } => format!("{} > {}", render_expr(lhs), render_expr(rhs)),
        Expr::ForceUnwrap { inner } => format!("{}!", render_expr(inner)),
        Expr::Call {
            callee,
            arguments,
            optional_chained,
        } => {
            let args: Vec<String> = arguments.iter().map(render_expr).collect();
            format!(
                "{}{}({})",
                render_expr(callee),
                if *optional_chained { "?" } else { "" },
                args.join(", ")
            )
        }
        Expr::Try { inner } => format!("try {}", render_expr(inner)),
        Expr::Await { inner } => format!("await {}", render_expr(inner)),
        Expr::ForceCast { inner, ty } => format!("{} as! {}", render_expr(inner), render_type(ty)),
    }
}

fn render_generics(generics: &[GenericParameter]) -> String {
    if generics.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = generics
        .iter()
        .map(|g| match &g.constraint {
            Some(constraint) => format!("{}: {}", g.name, constraint),
            None => g.name.clone(),
        })
        .collect();
    format!("<{}>", inner.join(", "))
}

fn render_parameter_type(param: &Parameter) -> String {
    let mut rendered = String::new();
    for attribute in &param.attributes {
        rendered.push_str(attribute);
        rendered.push(' ');
    }
    rendered.push_str(&render_type(&param.ty));
    if param.is_variadic {
        rendered.push_str("...");
    }
    rendered
}

/// Function parameters: `id: Int`, `_ data: T`, `for duration: Duration`.
fn render_function_parameter(param: &Parameter) -> String {
    let ty = render_parameter_type(param);
    match param.label.as_deref() {
        Some(label) if label == param.internal_name => format!("{}: {}", label, ty),
        Some(label) => format!("{} {}: {}", label, param.internal_name, ty),
        None => format!("_ {}: {}", param.internal_name, ty),
    }
}

/// Subscript parameters are unlabeled unless a label is spelled out.
fn render_subscript_parameter(param: &Parameter) -> String {
    let ty = render_parameter_type(param);
    match param.label.as_deref() {
        Some(label) => format!("{} {}: {}", label, param.internal_name, ty),
        None => format!("{}: {}", param.internal_name, ty),
    }
}

fn render_effects(is_async: bool, is_throwing: bool) -> String {
    match (is_async, is_throwing) {
        (true, true) => " async throws".to_string(),
        (true, false) => " async".to_string(),
        (false, true) => " throws".to_string(),
        (false, false) => String::new(),
    }
}

/// Renders a complete spy, including the optional `#if` guard.
pub fn render_swift(spy: &GeneratedSpy, options: &RenderOptions) -> String {
    let mut renderer = SwiftRenderer::new(spy.access_level, options);
    renderer.spy(spy);
    renderer.out
}

struct SwiftRenderer {
    out: String,
    indent_unit: String,
    depth: usize,
    modifier: String,
}

impl SwiftRenderer {
    fn new(access_level: Option<AccessLevel>, options: &RenderOptions) -> Self {
        let modifier = match access_level {
            Some(AccessLevel::Internal) | None => String::new(),
            Some(level) => format!("{} ", level.keyword()),
        };
        Self {
            out: String::new(),
            indent_unit: " ".repeat(options.indent_width),
            depth: 0,
            modifier,
        }
    }

    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str(&self.indent_unit);
        }
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{}", text);
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn spy(&mut self, spy: &GeneratedSpy) {
        if let Some(guard) = &spy.compilation_guard {
            self.line(&format!("#if {}", guard));
        }

        let header = format!(
            "{}class {}{}: {}",
            self.modifier,
            spy.name,
            render_generics(&spy.generic_parameters),
            spy.conforms_to
        );
        self.open(&header);
        let init = format!("{}init() {{}}", self.modifier);
        self.line(&init);

        let mut previous_was_implementation = true;
        for declaration in &spy.members {
            let is_implementation = declaration.is_implementation();
            if is_implementation || previous_was_implementation {
                self.line("");
            }
            self.declaration(declaration);
            previous_was_implementation = is_implementation;
        }
        self.close();

        if spy.compilation_guard.is_some() {
            self.line("#endif");
        }
    }

    fn declaration(&mut self, declaration: &GeneratedDeclaration) {
        match declaration {
            GeneratedDeclaration::StoredField {
                name,
                ty,
                default_value,
            } => {
                let default = default_value
                    .as_ref()
                    .map(|v| format!(" = {}", render_expr(v)))
                    .unwrap_or_default();
                let text = format!("{}var {}: {}{}", self.modifier, name, render_type(ty), default);
                self.line(&text);
            }
            GeneratedDeclaration::ComputedProperty {
                name,
                ty,
                getter,
                setter,
            } => {
                let header = format!("{}var {}: {}", self.modifier, name, render_type(ty));
                self.open(&header);
                self.accessors(getter, setter.as_deref(), "");
                self.close();
            }
            GeneratedDeclaration::FunctionImplementation {
                signature,
                statements,
            } => {
                let header = self.function_header(signature);
                self.open(&header);
                self.statements(statements);
                self.close();
            }
            GeneratedDeclaration::SubscriptImplementation {
                signature,
                getter,
                setter,
            } => {
                let header = self.subscript_header(signature);
                self.open(&header);
                let effects = render_effects(signature.is_async, signature.is_throwing);
                self.accessors(getter, setter.as_deref(), &effects);
                self.close();
            }
        }
    }

    /// A lone getter without effects uses the shorthand body form.
    fn accessors(&mut self, getter: &[Statement], setter: Option<&[Statement]>, effects: &str) {
        match setter {
            None if effects.is_empty() => self.statements(getter),
            _ => {
                self.open(&format!("get{}", effects));
                self.statements(getter);
                self.close();
                if let Some(setter) = setter {
                    self.open("set");
                    self.statements(setter);
                    self.close();
                }
            }
        }
    }

    fn function_header(&self, signature: &FunctionSignature) -> String {
        let params: Vec<String> = signature
            .parameters
            .iter()
            .map(render_function_parameter)
            .collect();
        let returns = signature
            .return_type
            .as_ref()
            .map(|ty| format!(" -> {}", render_type(ty)))
            .unwrap_or_default();
        format!(
            "{}func {}{}({}){}{}",
            self.modifier,
            signature.name,
            render_generics(&signature.generic_parameters),
            params.join(", "),
            render_effects(signature.is_async, signature.is_throwing),
            returns
        )
    }

    fn subscript_header(&self, signature: &SubscriptSignature) -> String {
        let params: Vec<String> = signature
            .parameters
            .iter()
            .map(render_subscript_parameter)
            .collect();
        format!(
            "{}subscript{}({}) -> {}",
            self.modifier,
            render_generics(&signature.generic_parameters),
            params.join(", "),
            render_type(&signature.return_type)
        )
    }

    fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Increment { target } => self.line(&format!("{} += 1", target)),
            Statement::Assign { target, value } => {
                self.line(&format!("{} = {}", target, render_expr(value)))
            }
            Statement::Append { target, value } => {
                self.line(&format!("{}.append({})", target, render_expr(value)))
            }
            Statement::ThrowIfPresent { field } => {
                self.open(&format!("if let error = {}", field));
                self.line("throw error");
                self.close();
            }
            Statement::IfPresent {
                field,
                then,
                otherwise,
            } => {
                self.open(&format!("if {} != nil", field));
                self.statements(then);
                if !otherwise.is_empty() {
                    self.depth = self.depth.saturating_sub(1);
                    self.line("} else {");
                    self.depth += 1;
                    self.statements(otherwise);
                }
                self.close();
            }
            Statement::Return { value: Some(value) } => {
                self.line(&format!("return {}", render_expr(value)))
            }
            Statement::Return { value: None } => self.line("return"),
            Statement::Expression { expr } => self.line(&render_expr(expr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TupleElement;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_optional_function_types_are_parenthesized() {
        let closure = SemanticType::function(vec![SemanticType::int()], false, false, SemanticType::named("String"))
            .optional();
        assert_eq!(render_type(&closure), "((Int) -> String)?");

        let unwrapped = SemanticType::function(vec![], true, true, SemanticType::void())
            .implicitly_unwrapped();
        assert_eq!(render_type(&unwrapped), "(() async throws -> Void)!");
    }

    #[test]
    fn test_existential_optional_is_parenthesized() {
        assert_eq!(
            render_type(&SemanticType::named("any Error").optional()),
            "(any Error)?"
        );
        assert_eq!(render_type(&SemanticType::error().optional()), "Error?");
    }

    #[test]
    fn test_collection_and_tuple_types() {
        let tuple = SemanticType::Tuple {
            elements: vec![
                TupleElement::labeled("from", SemanticType::int()),
                TupleElement::labeled("to", SemanticType::int()),
            ],
        };
        assert_eq!(render_type(&tuple.array()), "[(from: Int, to: Int)]");
        assert_eq!(
            render_type(&SemanticType::Dictionary {
                key: Box::new(SemanticType::named("String")),
                value: Box::new(SemanticType::ErasedAny),
            }),
            "[String: Any]"
        );
    }

    #[test]
    fn test_render_effectful_cast_call() {
        let call = Expr::Call {
            callee: Box::new(Expr::ForceUnwrap {
                inner: Box::new(Expr::ident("loadClosure")),
            }),
            arguments: vec![Expr::ident("key")],
            optional_chained: false,
        }
        .with_effects(true, true)
        .force_cast(SemanticType::placeholder("T"));
        assert_eq!(render_expr(&call), "try await loadClosure!(key) as! T");
    }

    #[test]
    fn test_parameter_rendering() {
        let relabeled = Parameter::new(Some("for".into()), "duration", SemanticType::named("Duration"));
        assert_eq!(render_function_parameter(&relabeled), "for duration: Duration");
        assert_eq!(
            render_function_parameter(&Parameter::unlabeled("values", SemanticType::int()).variadic()),
            "_ values: Int..."
        );
        let callback = Parameter::labeled(
            "completion",
            SemanticType::function(vec![], false, false, SemanticType::void()),
        )
        .with_attribute("@escaping");
        assert_eq!(
            render_function_parameter(&callback),
            "completion: @escaping () -> Void"
        );
        assert_eq!(
            render_subscript_parameter(&Parameter::unlabeled("index", SemanticType::int())),
            "index: Int"
        );
    }
}
