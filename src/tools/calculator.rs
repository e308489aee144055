//! 四则运算求值
//!
//! 从自然语言查询中取出算式（数字、运算符、括号），按常规优先级求值。

use anyhow::{anyhow, bail};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// 保留查询中属于算式的字符，其余丢弃
pub fn extract_expression(query: &str) -> Option<String> {
    let expr: String = query
        .chars()
        .filter_map(|c| match c {
            '0'..='9' | '.' | '+' | '-' | '*' | '/' | '(' | ')' => Some(c),
            '×' => Some('*'),
            '÷' => Some('/'),
            c if c.is_whitespace() => Some(' '),
            _ => None,
        })
        .collect();
    let expr = expr.trim();
    if expr.chars().any(|c| c.is_ascii_digit()) {
        Some(expr.to_string())
    } else {
        None
    }
}

pub fn evaluate(expr: &str) -> anyhow::Result<f64> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        bail!("unexpected token {:?} in `{}`", token, expr);
    }
    if !value.is_finite() {
        bail!("result of `{}` is not a finite number", expr);
    }
    Ok(value)
}

/// 整数结果不带小数点
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn tokenize(expr: &str) -> anyhow::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| anyhow!("invalid number `{}`", literal))?;
                tokens.push(Token::Number(number));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => bail!("unexpected character `{}`", other),
                };
                tokens.push(token);
                chars.next();
            }
        }
    }
    Ok(tokens)
}

/// 括号嵌套上限
pub const MAX_NESTING: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> anyhow::Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.next();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> anyhow::Result<f64> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.next();
            let rhs = self.unary()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    bail!("division by zero");
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> anyhow::Result<f64> {
        // 连续的正负号在循环里折叠，不递归
        let mut negative = false;
        while let Some(sign @ (Token::Minus | Token::Plus)) = self.peek() {
            self.next();
            if sign == Token::Minus {
                negative = !negative;
            }
        }
        let value = self.primary()?;
        Ok(if negative { -value } else { value })
    }

    fn primary(&mut self) -> anyhow::Result<f64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                if self.depth >= MAX_NESTING {
                    bail!("expression nested too deeply");
                }
                self.depth += 1;
                let value = self.expression();
                self.depth -= 1;
                let value = value?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => bail!("missing closing parenthesis"),
                }
            }
            Some(token) => bail!("unexpected token {:?}", token),
            None => bail!("unexpected end of expression"),
        }
    }
}
