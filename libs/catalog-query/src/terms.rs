//! Free-text search phrase tokenization.
//!
//! Phrases split on whitespace with shell-like quoting: a double- or
//! single-quoted run becomes one term, so `milton "new york" 1987` searches
//! for three terms, one of them the two-word phrase. An unbalanced quote
//! falls back to plain whitespace splitting rather than rejecting the
//! search.

pub fn tokenize(phrase: &str) -> Vec<String> {
    match shell_split(phrase) {
        Ok(terms) => terms,
        Err(UnbalancedQuote) => phrase.split_whitespace().map(str::to_string).collect(),
    }
}

struct UnbalancedQuote;

fn shell_split(input: &str) -> Result<Vec<String>, UnbalancedQuote> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut in_term = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    in_term = true;
                }
                c if c.is_whitespace() => {
                    if in_term {
                        terms.push(std::mem::take(&mut current));
                        in_term = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_term = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(UnbalancedQuote);
    }
    if in_term {
        terms.push(current);
    }
    Ok(terms)
}
