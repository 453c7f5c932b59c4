//! Regenerates readable source text from a syntax tree.
//!
//! Used for rule texts in compiled programs and for code excerpts in
//! compile errors. Rendering is best-effort: nodes the front end could not
//! classify cannot be rendered.

use crate::error::{AstError, AstResult};
use crate::node::AstNode;

const UNARY_METHODS: [(&str, &str); 4] = [("-@", "-"), ("+@", "+"), ("~", "~"), ("!", "!")];

/// Render a node as source text.
pub fn render(node: &AstNode) -> AstResult<String> {
    let mut out = String::new();
    write_node(node, 0, &mut out)?;
    Ok(out)
}

fn write_node(node: &AstNode, indent: usize, out: &mut String) -> AstResult<()> {
    match node {
        AstNode::Definition { name, params, body } => {
            out.push_str("def ");
            out.push_str(name);
            if !params.is_empty() {
                out.push('(');
                out.push_str(&params.join(", "));
                out.push(')');
            }
            out.push('\n');
            for child in body {
                write_node(child, indent + 1, out)?;
            }
            push_indent(indent, out);
            out.push_str("end");
        }
        AstNode::Scope { body } => write_node(body, indent, out)?,
        AstNode::Block { statements } => {
            for stmt in statements {
                push_indent(indent, out);
                out.push_str(&render_expr(stmt)?);
                out.push('\n');
            }
        }
        other => out.push_str(&render_expr(other)?),
    }
    Ok(())
}

fn render_expr(node: &AstNode) -> AstResult<String> {
    match node {
        AstNode::Call {
            receiver,
            method,
            args,
        } => render_call(receiver.as_deref(), method, args),
        AstNode::Iter { call, params, body } => {
            let head = render_expr(call)?;
            let stmts = body.iter().map(render_expr).collect::<AstResult<Vec<_>>>()?;
            let params = if params.is_empty() {
                String::new()
            } else {
                format!("|{}| ", params.join(", "))
            };
            Ok(format!("{} {{ {}{} }}", head, params, stmts.join("; ")))
        }
        AstNode::Assign { name, value } => Ok(format!("{} = {}", name, render_expr(value)?)),
        AstNode::Ident { name } => Ok(name.clone()),
        AstNode::Literal { text } => Ok(text.clone()),
        AstNode::Array { items } => {
            let items = items.iter().map(render_expr).collect::<AstResult<Vec<_>>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        AstNode::Opaque { tag } => Err(AstError::Unrenderable(format!(
            "unclassified construct '{}'",
            tag
        ))),
        AstNode::Definition { .. } | AstNode::Scope { .. } | AstNode::Block { .. } => {
            Err(AstError::Unrenderable(format!(
                "{} in expression position",
                node.kind()
            )))
        }
    }
}

fn render_call(receiver: Option<&AstNode>, method: &str, args: &[AstNode]) -> AstResult<String> {
    if method.is_empty() {
        return Err(AstError::Unrenderable("call without a method name".into()));
    }

    let Some(receiver) = receiver else {
        if args.is_empty() {
            return Ok(method.to_string());
        }
        return Ok(format!("{}({})", method, render_args(args)?));
    };

    if args.is_empty() {
        if let Some((_, sym)) = UNARY_METHODS.iter().find(|(m, _)| *m == method) {
            return Ok(format!("{}{}", sym, render_operand(receiver)?));
        }
    }

    if is_operator(method) && args.len() == 1 {
        let lhs = render_operand(receiver)?;
        // `a < -@(b)` is how `a <- b` arrives; print it back as written.
        if method == "<" {
            if let AstNode::Call {
                receiver: Some(body),
                method: tail,
                args: tail_args,
            } = &args[0]
            {
                if tail_args.is_empty() {
                    if let Some((_, sym)) = UNARY_METHODS.iter().find(|(m, _)| m == tail) {
                        return Ok(format!("{} <{} {}", lhs, sym, render_expr(body)?));
                    }
                }
            }
        }
        if method == "[]" {
            return Ok(format!("{}[{}]", lhs, render_expr(&args[0])?));
        }
        return Ok(format!("{} {} {}", lhs, method, render_expr(&args[0])?));
    }

    let recv = render_operand(receiver)?;
    if args.is_empty() {
        Ok(format!("{}.{}", recv, method))
    } else {
        Ok(format!("{}.{}({})", recv, method, render_args(args)?))
    }
}

fn render_args(args: &[AstNode]) -> AstResult<String> {
    Ok(args
        .iter()
        .map(render_expr)
        .collect::<AstResult<Vec<_>>>()?
        .join(", "))
}

/// Operands that are themselves binary operations get parenthesized.
fn render_operand(node: &AstNode) -> AstResult<String> {
    let text = render_expr(node)?;
    match node {
        AstNode::Call {
            receiver: Some(_),
            method,
            args,
        } if is_operator(method) && args.len() == 1 => Ok(format!("({})", text)),
        _ => Ok(text),
    }
}

fn is_operator(method: &str) -> bool {
    method
        .chars()
        .next()
        .map(|c| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(false)
}

fn push_indent(indent: usize, out: &mut String) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_deductive_rule() {
        let stmt = AstNode::deductive(
            "link",
            AstNode::iter(
                AstNode::method(AstNode::collection("edge"), "map"),
                &["e"],
                vec![AstNode::ident("e")],
            ),
        );
        assert_eq!(render(&stmt).unwrap(), "link <= edge.map { |e| e }");
    }

    #[test]
    fn renders_superators_as_written() {
        let plus = AstNode::superator("pipe_out", "+@", AstNode::collection("pipe"));
        let minus = AstNode::superator("pipe", "-@", AstNode::collection("pipe_out"));
        let tilde = AstNode::superator("pipe_chan", "~", AstNode::collection("pipe"));
        assert_eq!(render(&plus).unwrap(), "pipe_out <+ pipe");
        assert_eq!(render(&minus).unwrap(), "pipe <- pipe_out");
        assert_eq!(render(&tilde).unwrap(), "pipe_chan <~ pipe");
    }

    #[test]
    fn renders_calls_arrays_and_literals() {
        let body = AstNode::iter(
            AstNode::method(AstNode::collection("pipe"), "map"),
            &["p"],
            vec![AstNode::array(vec![
                AstNode::method(AstNode::ident("p"), "dst"),
                AstNode::literal("\"ack\""),
            ])],
        );
        assert_eq!(render(&body).unwrap(), "pipe.map { |p| [p.dst, \"ack\"] }");

        let notin = AstNode::call(
            Some(AstNode::collection("pipe")),
            "notin",
            vec![AstNode::collection("pipe_out")],
        );
        assert_eq!(render(&notin).unwrap(), "pipe.notin(pipe_out)");
        assert_eq!(
            render(&AstNode::call(None, "f", vec![AstNode::literal("1"), AstNode::literal("2")]))
                .unwrap(),
            "f(1, 2)"
        );
    }

    #[test]
    fn renders_assignment_and_index() {
        let stmt = AstNode::assign("x", AstNode::collection("y"));
        assert_eq!(render(&stmt).unwrap(), "x = y");
        let index = AstNode::binary(AstNode::ident("p"), "[]", AstNode::literal("0"));
        assert_eq!(render(&index).unwrap(), "p[0]");
    }

    #[test]
    fn renders_whole_definition() {
        let block = AstNode::rule_block(
            "done",
            vec![
                AstNode::superator("pipe_out", "+@", AstNode::collection("pipe")),
                AstNode::deductive("link", AstNode::collection("edge")),
            ],
        );
        assert_eq!(
            render(&block).unwrap(),
            "def done\n  pipe_out <+ pipe\n  link <= edge\nend"
        );
    }

    #[test]
    fn nested_operators_are_parenthesized() {
        let inner = AstNode::binary(AstNode::ident("a"), "+", AstNode::ident("b"));
        let outer = AstNode::binary(inner, "*", AstNode::ident("c"));
        assert_eq!(render(&outer).unwrap(), "(a + b) * c");
        let neg = AstNode::unary("-@", AstNode::binary(AstNode::ident("a"), "+", AstNode::ident("b")));
        assert_eq!(render(&neg).unwrap(), "-(a + b)");
    }

    #[test]
    fn opaque_nodes_fail() {
        let stmt = AstNode::deductive("a", AstNode::Opaque { tag: "dregx".into() });
        assert!(matches!(render(&stmt), Err(AstError::Unrenderable(_))));
    }

    #[test]
    fn empty_method_fails() {
        let node = AstNode::call(None, "", Vec::new());
        assert!(render(&node).is_err());
    }

    #[test]
    fn structural_nodes_in_expression_position_fail() {
        let stmt = AstNode::deductive("a", AstNode::Block { statements: vec![] });
        assert!(render(&stmt).is_err());
    }
}
