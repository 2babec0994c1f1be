//! Clause accumulation and rendering.
//!
//! A filter is assembled as an unordered bag of clause atoms, each tagged
//! with how it combines: Required atoms are AND-joined, Optional atoms are
//! OR-joined (parenthesized as a unit when there is more than one), and
//! Additive atoms are appended after the rest with a top-level OR.
//!
//! Atoms carry their own bind values, and rendering emits the SQL fragment
//! and the flattened bind list in a single pass over the partitioned atoms.
//! Placeholder positions therefore always agree with bind positions; there
//! is no ordering convention for callers to get wrong.

use std::str::FromStr;

use crate::error::{QueryError, Result};

/// How a clause combines with the rest of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// AND-joined with every other required clause.
    Required,
    /// OR-joined with the other optional clauses, grouped as one unit.
    Optional,
    /// Appended after the required/optional combination with a top-level OR.
    Additive,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Additive => "additive",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Required => 0,
            Self::Optional => 1,
            Self::Additive => 2,
        }
    }
}

impl FromStr for ClauseKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            "additive" => Ok(Self::Additive),
            _ => Err(QueryError::InvalidClauseKind(s.to_string())),
        }
    }
}

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Bool(bool),
    TextArray(Vec<String>),
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for BindValue {
    fn from(value: Vec<String>) -> Self {
        Self::TextArray(value)
    }
}

/// One filter fragment plus its bind values.
///
/// `expr` uses `?` placeholders; the number of `?` must equal
/// `values.len()`. Atoms are immutable once added to a [`ClauseSet`].
#[derive(Debug, Clone)]
pub struct ClauseAtom {
    kind: ClauseKind,
    expr: String,
    values: Vec<BindValue>,
}

impl ClauseAtom {
    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }
}

/// Insertion-ordered accumulator of clause atoms.
#[derive(Debug, Clone, Default)]
pub struct ClauseSet {
    atoms: Vec<ClauseAtom>,
}

/// A rendered filter: a predicate with `$n` placeholders and the bind
/// values in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub expr: String,
    pub binds: Vec<BindValue>,
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        self.expr.is_empty()
    }
}

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[ClauseAtom] {
        &self.atoms
    }

    /// Appends an atom. Fails when the `?` count in `expr` disagrees with
    /// the number of bind values; a fragment with no placeholders carries
    /// no values.
    pub fn add(
        &mut self,
        kind: ClauseKind,
        expr: impl Into<String>,
        values: Vec<BindValue>,
    ) -> Result<()> {
        let expr = expr.into();
        let placeholders = expr.matches('?').count();
        if placeholders != values.len() {
            return Err(QueryError::ClauseShape {
                expr,
                placeholders,
                values: values.len(),
            });
        }
        self.atoms.push(ClauseAtom { kind, expr, values });
        Ok(())
    }

    /// Renders the accumulated atoms to a predicate and its bind values.
    ///
    /// Atoms are partitioned by kind, preserving each group's insertion
    /// order (a stable sort by kind rank). Expression text and binds are
    /// produced by the same traversal: each `?` is rewritten to the next
    /// `$n` as its value is pushed, so the Nth placeholder always names
    /// the Nth bind. Rendering is pure; repeated calls yield identical
    /// output.
    pub fn render(&self) -> Rendered {
        let mut ordered: Vec<&ClauseAtom> = self.atoms.iter().collect();
        ordered.sort_by_key(|a| a.kind.rank());

        let mut binds = Vec::new();
        let mut required = Vec::new();
        let mut optional = Vec::new();
        let mut additive = Vec::new();
        for atom in ordered {
            let fragment = number_placeholders(atom, &mut binds);
            match atom.kind {
                ClauseKind::Required => required.push(fragment),
                ClauseKind::Optional => optional.push(fragment),
                ClauseKind::Additive => additive.push(fragment),
            }
        }

        let mut expr = required.join(" AND ");

        if !optional.is_empty() {
            let group = if optional.len() == 1 {
                optional.remove(0)
            } else {
                format!("({})", optional.join(" OR "))
            };
            if expr.is_empty() {
                expr = group;
            } else {
                expr.push_str(" AND ");
                expr.push_str(&group);
            }
        }

        for fragment in additive {
            if expr.is_empty() {
                expr = fragment;
            } else {
                expr.push_str(" OR ");
                expr.push_str(&fragment);
            }
        }

        Rendered { expr, binds }
    }
}

/// Rewrites each `?` in the atom's expression to `$n`, pushing the matching
/// bind value as it goes.
fn number_placeholders(atom: &ClauseAtom, binds: &mut Vec<BindValue>) -> String {
    let mut out = String::with_capacity(atom.expr.len() + 4);
    let mut next_value = atom.values.iter();
    for c in atom.expr.chars() {
        if c == '?' {
            // add() guarantees a value exists for every placeholder.
            binds.push(next_value.next().expect("placeholder without value").clone());
            out.push('$');
            out.push_str(&binds.len().to_string());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Vec<BindValue> {
        vec![BindValue::Int(v)]
    }

    #[test]
    fn clause_kind_parses_external_spellings() {
        assert_eq!("required".parse::<ClauseKind>().unwrap(), ClauseKind::Required);
        assert_eq!("Optional".parse::<ClauseKind>().unwrap(), ClauseKind::Optional);
        assert_eq!("ADDITIVE".parse::<ClauseKind>().unwrap(), ClauseKind::Additive);
        assert!(matches!(
            "narrowing".parse::<ClauseKind>(),
            Err(QueryError::InvalidClauseKind(s)) if s == "narrowing"
        ));
    }

    #[test]
    fn add_rejects_placeholder_value_mismatch() {
        let mut set = ClauseSet::new();
        let err = set
            .add(ClauseKind::Required, "a = ? AND b = ?", int(1))
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::ClauseShape {
                placeholders: 2,
                values: 1,
                ..
            }
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn required_only_joins_with_and() {
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Required, "a = ?", int(1)).unwrap();
        set.add(ClauseKind::Required, "b = ?", int(2)).unwrap();
        let rendered = set.render();
        assert_eq!(rendered.expr, "a = $1 AND b = $2");
        assert_eq!(rendered.binds, vec![BindValue::Int(1), BindValue::Int(2)]);
    }

    #[test]
    fn single_optional_is_verbatim_without_parens() {
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Optional, "a ILIKE ?", vec!["%x%".into()])
            .unwrap();
        let rendered = set.render();
        assert_eq!(rendered.expr, "a ILIKE $1");
    }

    #[test]
    fn multiple_optionals_are_grouped() {
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Required, "y = ?", int(1987)).unwrap();
        set.add(ClauseKind::Optional, "a ILIKE ?", vec!["%x%".into()])
            .unwrap();
        set.add(ClauseKind::Optional, "b ILIKE ?", vec!["%x%".into()])
            .unwrap();
        let rendered = set.render();
        assert_eq!(rendered.expr, "y = $1 AND (a ILIKE $2 OR b ILIKE $3)");
    }

    #[test]
    fn additive_atoms_trail_with_top_level_or() {
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Additive, "pinned = ?", vec![true.into()])
            .unwrap();
        set.add(ClauseKind::Required, "a = ?", int(1)).unwrap();
        let rendered = set.render();
        assert_eq!(rendered.expr, "a = $1 OR pinned = $2");
        assert_eq!(
            rendered.binds,
            vec![BindValue::Int(1), BindValue::Bool(true)]
        );
    }

    #[test]
    fn atoms_without_placeholders_contribute_no_binds() {
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Required, "deleted_at IS NULL", Vec::new())
            .unwrap();
        set.add(ClauseKind::Required, "a = ?", int(5)).unwrap();
        let rendered = set.render();
        assert_eq!(rendered.expr, "deleted_at IS NULL AND a = $1");
        assert_eq!(rendered.binds, vec![BindValue::Int(5)]);
    }

    #[test]
    fn multi_placeholder_atom_binds_in_expression_order() {
        let mut set = ClauseSet::new();
        set.add(
            ClauseKind::Required,
            "(a ILIKE ? OR b ILIKE ?)",
            vec!["%x%".into(), "x%".into()],
        )
        .unwrap();
        let rendered = set.render();
        assert_eq!(rendered.expr, "(a ILIKE $1 OR b ILIKE $2)");
        assert_eq!(
            rendered.binds,
            vec![
                BindValue::Text("%x%".to_string()),
                BindValue::Text("x%".to_string())
            ]
        );
    }

    #[test]
    fn rendering_is_insertion_order_independent_across_kinds() {
        // Three required (1,2,3), two optional (4,5), two additive (6,7),
        // added in scrambled order.
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Additive, "g = ?", int(6)).unwrap();
        set.add(ClauseKind::Optional, "d = ?", int(4)).unwrap();
        set.add(ClauseKind::Required, "a = ?", int(1)).unwrap();
        set.add(ClauseKind::Additive, "h = ?", int(7)).unwrap();
        set.add(ClauseKind::Required, "b = ?", int(2)).unwrap();
        set.add(ClauseKind::Optional, "e = ?", int(5)).unwrap();
        set.add(ClauseKind::Required, "c = ?", int(3)).unwrap();

        let rendered = set.render();
        assert_eq!(
            rendered.expr,
            "a = $1 AND b = $2 AND c = $3 AND (d = $4 OR e = $5) OR g = $6 OR h = $7"
        );
        assert_eq!(
            rendered.binds,
            (1..=7).map(BindValue::Int).collect::<Vec<_>>()
        );
    }

    #[test]
    fn render_is_idempotent() {
        let mut set = ClauseSet::new();
        set.add(ClauseKind::Optional, "a = ?", int(1)).unwrap();
        set.add(ClauseKind::Required, "b = ?", int(2)).unwrap();
        set.add(ClauseKind::Additive, "c = ?", int(3)).unwrap();
        let first = set.render();
        let second = set.render();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_set_renders_empty() {
        let rendered = ClauseSet::new().render();
        assert!(rendered.is_empty());
        assert!(rendered.binds.is_empty());
    }
}
