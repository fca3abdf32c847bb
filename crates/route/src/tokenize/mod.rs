//! Shell-style splitting of an input line into tokens.
//!
//! Whitespace separates tokens. Single quotes are literal, double quotes honor
//! backslash escapes, and outside quotes a backslash escapes the next char.

use crate::error::TokenizeError;


/// Splits `line` into tokens.
pub fn split_args(line: &str) -> Result<Vec<String>, TokenizeError> {
	let mut tokens = Vec::new();
	let mut current = String::new();
	let mut in_token = false;
	let mut chars = line.char_indices();

	while let Some((position, ch)) = chars.next() {
		match ch {
			c if c.is_whitespace() => {
				if in_token {
					tokens.push(std::mem::take(&mut current));
					in_token = false;
				}
			}
			'\'' => {
				in_token = true;
				loop {
					match chars.next() {
						Some((_, '\'')) => break,
						Some((_, c)) => current.push(c),
						None => return Err(TokenizeError::UnterminatedQuote { quote: '\'', position }),
					}
				}
			}
			'"' => {
				in_token = true;
				loop {
					match chars.next() {
						Some((_, '"')) => break,
						Some((_, '\\')) => match chars.next() {
							Some((_, c)) => current.push(c),
							None => return Err(TokenizeError::UnterminatedQuote { quote: '"', position }),
						},
						Some((_, c)) => current.push(c),
						None => return Err(TokenizeError::UnterminatedQuote { quote: '"', position }),
					}
				}
			}
			'\\' => {
				in_token = true;
				match chars.next() {
					Some((_, c)) => current.push(c),
					None => return Err(TokenizeError::TrailingBackslash),
				}
			}
			c => {
				in_token = true;
				current.push(c);
			}
		}
	}

	if in_token {
		tokens.push(current);
	}
	Ok(tokens)
}
