use std::io::{self, Write};

use ron::ser::PrettyConfig;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstDumpFormat {
    /// An indented tree, one node per line.
    Pretty,
    Debug,
    Ron,
}

pub fn dump_ast(format: AstDumpFormat, ast: &Program<'_>, mut out: impl Write) -> io::Result<()> {
    match format {
        AstDumpFormat::Pretty => Dumper { out, level: 0 }.visit_program(ast),
        AstDumpFormat::Debug => writeln!(out, "{:#?}", ast),

        AstDumpFormat::Ron => {
            let text = ron::ser::to_string_pretty(ast, PrettyConfig::default())
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            writeln!(out, "{}", text)
        }
    }
}

struct Dumper<W: Write> {
    out: W,
    level: usize,
}

impl<W: Write> Dumper<W> {
    fn write_indent(&mut self) -> io::Result<()> {
        write!(&mut self.out, "{:width$}", "", width = 2 * self.level)
    }

    fn indented_line<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.write_indent()?;
        f(&mut *self)?;
        writeln!(&mut self.out)?;

        Ok(())
    }

    fn with_nested<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.level += 1;
        f(&mut *self)?;
        self.level -= 1;

        Ok(())
    }
}

impl<'buf, W: Write> Visitor<'buf> for Dumper<W> {
    type Output = io::Result<()>;

    fn visit_program(&mut self, program: &Program<'buf>) -> Self::Output {
        for stmt in &program.stmts {
            self.visit_stmt(stmt)?;
        }

        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'buf>) -> Self::Output {
        match stmt {
            Stmt::Declaration(decl) => self.visit_declaration(decl),
            Stmt::Assignment(assignment) => self.visit_assignment(assignment),
            Stmt::Function(func) => self.visit_function(func),
        }
    }

    fn visit_declaration(&mut self, decl: &Declaration<'buf>) -> Self::Output {
        self.indented_line(|this| {
            write!(&mut this.out, "Declaration ")?;

            if decl.is_const {
                write!(&mut this.out, "const ")?;
            }

            this.visit_name(&decl.name)?;
            write!(&mut this.out, ": {}", decl.ty.value)
        })?;

        self.with_nested(|this| this.visit_expr(&decl.init))
    }

    fn visit_assignment(&mut self, assignment: &Assignment<'buf>) -> Self::Output {
        self.indented_line(|this| {
            write!(&mut this.out, "Assignment ")?;
            this.visit_name(&assignment.name)
        })?;

        self.with_nested(|this| this.visit_expr(&assignment.init))
    }

    fn visit_function(&mut self, func: &Function<'buf>) -> Self::Output {
        self.indented_line(|this| {
            write!(&mut this.out, "Function ")?;
            this.visit_name(&func.name)?;
            write!(&mut this.out, "(")?;

            for (i, param) in func.params.iter().enumerate() {
                if i > 0 {
                    write!(&mut this.out, ", ")?;
                }

                this.visit_param(param)?;
            }

            write!(&mut this.out, ") -> {}", func.return_ty.value)
        })
    }

    fn visit_param(&mut self, param: &Param<'buf>) -> Self::Output {
        write!(&mut self.out, "{} ", param.ty.value)?;
        self.visit_name(&param.name)
    }

    fn visit_expr(&mut self, expr: &Expr<'buf>) -> Self::Output {
        match expr {
            Expr::Ident(name) => self.indented_line(|this| {
                write!(&mut this.out, "Identifier ")?;
                this.visit_name(name)
            }),

            Expr::Number(lit) => self.indented_line(|this| this.visit_number_lit(lit)),
            Expr::BinOp(expr) => self.visit_bin_op(expr),
        }
    }

    fn visit_bin_op(&mut self, expr: &BinOpExpr<'buf>) -> Self::Output {
        self.indented_line(|this| write!(&mut this.out, "BinaryOp {}", expr.op.value))?;

        self.with_nested(|this| {
            this.visit_expr(&expr.lhs)?;
            this.visit_expr(&expr.rhs)
        })
    }

    fn visit_name(&mut self, name: &Name<'buf>) -> Self::Output {
        write!(&mut self.out, "{}", name.as_str())
    }

    fn visit_number_lit(&mut self, expr: &NumberLit<'buf>) -> Self::Output {
        write!(&mut self.out, "NumberLiteral {}", expr.as_str())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::parse::{Cursor, Lexer, Parser};

    fn dump(src: &str, format: AstDumpFormat) -> String {
        let parsed = Parser::new(Lexer::new(Cursor::detached(src))).parse();
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

        let mut buf = vec![];
        dump_ast(format, &parsed.program, &mut buf).unwrap();

        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn pretty_tree() {
        let src = "Const Int4 x = 42;\n\
                   Var Vec3 v = * x + x 1.5;\n\
                   Bool flag = ! a b;\n\
                   x = y;\n\
                   void main(Int8 a, Float b) { return; }\n";

        assert_snapshot!(dump(src, AstDumpFormat::Pretty), @r###"
        Declaration const x: Int4
          NumberLiteral 42
        Declaration v: Vec3
          BinaryOp *
            Identifier x
            BinaryOp +
              Identifier x
              NumberLiteral 1.5
        Declaration flag: Bool
          BinaryOp !
            Identifier a
            Identifier b
        Assignment x
          Identifier y
        Function main(Int8 a, Float b) -> void
        "###);
    }

    #[test]
    fn ron_output_names_every_statement() {
        let out = dump("Var Float f = 2;\nInt4 g() {}", AstDumpFormat::Ron);

        assert!(out.contains("Declaration("), "{out}");
        assert!(out.contains("Function("), "{out}");
        assert!(out.contains("\"f\""), "{out}");
    }

    #[test]
    fn empty_program_dumps_nothing() {
        assert_eq!(dump("// nothing here\n", AstDumpFormat::Pretty), "");
    }
}
