use super::*;

impl<'a> Parser<'a> {
    /// `type := btype ("->" btype)*`
    pub(super) fn parse_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        let mut parts = vec![self.parse_btype()?];
        while self.eat(&Token::Arrow) {
            parts.push(self.parse_btype()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(TypeExpr::Function { parts })
        }
    }

    /// A constructor applied to arguments, or a single atom.
    fn parse_btype(&mut self) -> Result<TypeExpr, SyntaxError> {
        if self.at(&Token::UpperIdent) {
            let name = self.expect_upper_path()?;
            let args = self.parse_type_args()?;
            Ok(TypeExpr::Constructor { name, args })
        } else {
            self.parse_atype()
        }
    }

    /// One alternative of a union type: `Name atype*`.
    pub(super) fn parse_constructor(&mut self) -> Result<Constructor, SyntaxError> {
        let name = self.expect_upper_path()?;
        let args = self.parse_type_args()?;
        Ok(Constructor { name, args })
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>, SyntaxError> {
        let mut args = Vec::new();
        while self.starts_atype() {
            args.push(self.parse_atype()?);
        }
        Ok(args)
    }

    fn starts_atype(&self) -> bool {
        self.peek().is_some_and(|t| {
            matches!(t.node, Token::UpperIdent | Token::LBrace | Token::LParen) || is_lower_name(&t.node)
        })
    }

    fn parse_atype(&mut self) -> Result<TypeExpr, SyntaxError> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected_end("type"));
        };
        match &tok.node {
            Token::UpperIdent => {
                let name = self.expect_upper_path()?;
                Ok(TypeExpr::Constructor { name, args: Vec::new() })
            }
            Token::LBrace => self.parse_record(),
            Token::LParen => self.parse_paren_type(),
            t if is_lower_name(t) => Ok(TypeExpr::Var { name: self.expect_lower()? }),
            other => Err(SyntaxError::new(format!("expected type, found {other}"), tok.span)),
        }
    }

    fn parse_record(&mut self) -> Result<TypeExpr, SyntaxError> {
        self.expect(&Token::LBrace)?;
        if self.eat(&Token::RBrace) {
            return Ok(TypeExpr::Record { fields: Vec::new() });
        }

        // `{ r | ...` commits to the extensible form
        let extensible = self.peek().is_some_and(|t| is_lower_name(&t.node)) && self.at_nth(1, &Token::Pipe);
        let base = if extensible {
            let base = self.expect_lower()?;
            self.expect(&Token::Pipe)?;
            Some(base)
        } else {
            None
        };

        let mut fields = vec![self.parse_record_field()?];
        while self.eat(&Token::Comma) {
            fields.push(self.parse_record_field()?);
        }
        self.expect(&Token::RBrace)?;

        Ok(match base {
            Some(base) => TypeExpr::ExtensibleRecord { base, fields },
            None => TypeExpr::Record { fields },
        })
    }

    fn parse_record_field(&mut self) -> Result<RecordField, SyntaxError> {
        let name = self.expect_lower()?;
        self.expect(&Token::Colon)?;
        let ty = self.parse_type()?;
        Ok(RecordField { name, ty })
    }

    /// `()` is unit, `(t)` is just `t`, `(a, b, ...)` is a tuple.
    fn parse_paren_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        self.expect(&Token::LParen)?;
        if self.eat(&Token::RParen) {
            return Ok(TypeExpr::Tuple { items: Vec::new() });
        }
        let first = self.parse_type()?;
        if !self.at(&Token::Comma) {
            self.expect(&Token::RParen)?;
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&Token::Comma) {
            items.push(self.parse_type()?);
        }
        self.expect(&Token::RParen)?;
        Ok(TypeExpr::Tuple { items })
    }
}
