//! Marker-substitution parser for nested generic type strings.
//!
//! Each innermost `<...>` (the first `>` paired with the nearest `<` before
//! it) is replaced by `#N` and its interior recorded under `N`, until no
//! angle brackets remain. The flat result is then read back recursively:
//! a segment is `name`, an optional marker, `[]` groups and an optional `?`.

use super::{TypeSig, TypeSigError, WILDCARD, WILDCARD_EXTENDS, WILDCARD_SUPER};

const MARKER: char = '#';

/// Parse a flattened type string such as `Map<String, List<int>>[]`.
pub fn parse(text: &str) -> Result<TypeSig, TypeSigError> {
    let input = text.trim();
    if input.contains(MARKER) {
        return Err(TypeSigError::ContainsMarker(input.to_string()));
    }

    let mut working = input.to_string();
    let mut param_sets: Vec<Option<String>> = Vec::new();
    while let Some(close) = working.find('>') {
        let open = working[..close]
            .rfind('<')
            .ok_or_else(|| TypeSigError::UnmatchedClose(input.to_string()))?;
        param_sets.push(Some(working[open + 1..close].to_string()));
        let marker = format!("{}{}", MARKER, param_sets.len() - 1);
        working.replace_range(open..=close, &marker);
    }
    if working.contains('<') {
        return Err(TypeSigError::UnmatchedOpen(input.to_string()));
    }

    let mut markers = MarkerTable {
        sets: param_sets,
        input,
    };
    parse_segment(&working, &mut markers)
}

/// Parameter lists recorded during substitution, each consumed once.
struct MarkerTable<'a> {
    sets: Vec<Option<String>>,
    input: &'a str,
}

impl MarkerTable<'_> {
    fn take(&mut self, marker: &str) -> Result<String, TypeSigError> {
        marker
            .parse::<usize>()
            .ok()
            .and_then(|index| self.sets.get_mut(index))
            .and_then(Option::take)
            .ok_or_else(|| TypeSigError::InvalidMarker(self.input.to_string()))
    }
}

fn parse_segment(segment: &str, markers: &mut MarkerTable<'_>) -> Result<TypeSig, TypeSigError> {
    let mut rest = segment.trim();

    if let Some(bound) = rest.strip_prefix('?') {
        return parse_wildcard(bound, markers);
    }

    let mut nullable = false;
    if let Some(stripped) = rest.strip_suffix('?') {
        nullable = true;
        rest = stripped.trim_end();
    }

    let mut array_dimensions = 0;
    while let Some(stripped) = rest.strip_suffix("[]") {
        array_dimensions += 1;
        rest = stripped.trim_end();
    }

    // element nullability as in `int?[]`
    if let Some(stripped) = rest.strip_suffix('?') {
        nullable = true;
        rest = stripped.trim_end();
    }

    let (name, params) = match rest.find(MARKER) {
        Some(at) => {
            let set = markers.take(&rest[at + 1..])?;
            let params = set
                .split(',')
                .map(|param| parse_segment(param, markers))
                .collect::<Result<Vec<_>, _>>()?;
            (rest[..at].trim_end(), params)
        }
        None => (rest, Vec::new()),
    };

    if name.is_empty() {
        return Err(TypeSigError::EmptyName(markers.input.to_string()));
    }

    Ok(TypeSig {
        name: name.to_string(),
        nullable,
        array_dimensions,
        params,
    })
}

/// Java `?`, `? extends T` or `? super T`, with the leading `?` removed.
fn parse_wildcard(bound: &str, markers: &mut MarkerTable<'_>) -> Result<TypeSig, TypeSigError> {
    let bound = bound.trim_start();
    if bound.is_empty() {
        return Ok(TypeSig::simple(WILDCARD));
    }
    for (keyword, name) in [("extends", WILDCARD_EXTENDS), ("super", WILDCARD_SUPER)] {
        if let Some(target) = bound.strip_prefix(keyword) {
            if target.starts_with(' ') {
                return Ok(TypeSig {
                    params: vec![parse_segment(target, markers)?],
                    ..TypeSig::simple(name)
                });
            }
        }
    }
    Err(TypeSigError::EmptyName(markers.input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(name: &str) -> TypeSig {
        TypeSig::simple(name)
    }

    fn generic(name: &str, params: Vec<TypeSig>) -> TypeSig {
        TypeSig {
            params,
            ..TypeSig::simple(name)
        }
    }

    #[test]
    fn test_single_generic_parameter() {
        assert_eq!(parse("thing<abc>").unwrap(), generic("thing", vec![simple("abc")]));
    }

    #[test]
    fn test_nested_generic_parameters() {
        assert_eq!(
            parse("thing<abc, _def<sub>>").unwrap(),
            generic("thing", vec![simple("abc"), generic("_def", vec![simple("sub")])])
        );
    }

    #[test]
    fn test_array_dimensions_after_generics() {
        let sig = parse("thing<abc>[][]").unwrap();
        assert_eq!(sig.array_dimensions, 2);
        assert_eq!(sig.params, vec![simple("abc")]);
        assert!(!sig.nullable);
    }

    #[test]
    fn test_java_wildcards() {
        let sig = parse("Map<?, ? extends List<? super T>>").unwrap();
        assert_eq!(sig.params[0], simple("?"));
        assert_eq!(sig.params[1].name, "? extends");
        assert!(sig.params[1].is_wildcard());
        let list = &sig.params[1].params[0];
        assert_eq!(list.name, "List");
        assert_eq!(list.params, vec![generic("? super", vec![simple("T")])]);
        assert_eq!(sig.to_string(), "Map<?, ? extends List<? super T>>");
        assert!(parse("List<? implements T>").is_err());
    }

    #[test]
    fn test_nullable() {
        let sig = parse("name?").unwrap();
        assert_eq!(sig.name, "name");
        assert!(sig.nullable);

        let sig = parse("List<int?>").unwrap();
        assert!(!sig.nullable);
        assert!(sig.params[0].nullable);

        let sig = parse("int?[]").unwrap();
        assert!(sig.nullable);
        assert_eq!(sig.array_dimensions, 1);
    }

    #[test]
    fn test_deep_nesting_without_spaces() {
        let sig = parse("Result<IDictionary<AaInfo,IList<BbInfo>>>").unwrap();
        assert_eq!(
            sig,
            generic(
                "Result",
                vec![generic(
                    "IDictionary",
                    vec![simple("AaInfo"), generic("IList", vec![simple("BbInfo")])]
                )]
            )
        );
    }

    #[test]
    fn test_arrays_inside_parameters() {
        let sig = parse("Map<String[], List<int>[]>").unwrap();
        assert_eq!(sig.params[0].array_dimensions, 1);
        assert_eq!(sig.params[1].array_dimensions, 1);
        assert_eq!(sig.params[1].params, vec![simple("int")]);
    }

    #[test]
    fn test_dotted_names_are_kept_whole() {
        let sig = parse("System.Collections.Generic.List<Models.Track>").unwrap();
        assert_eq!(sig.name, "System.Collections.Generic.List");
        assert_eq!(sig.params[0].name, "Models.Track");
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(parse("a<b").unwrap_err(), TypeSigError::UnmatchedOpen("a<b".into()));
        assert_eq!(parse("a>b").unwrap_err(), TypeSigError::UnmatchedClose("a>b".into()));
        assert_eq!(parse("a<b>>").unwrap_err(), TypeSigError::UnmatchedClose("a<b>>".into()));
        assert_eq!(parse("a#1").unwrap_err(), TypeSigError::ContainsMarker("a#1".into()));
        assert!(matches!(parse("<b>"), Err(TypeSigError::EmptyName(_))));
        assert!(matches!(parse("a<b, >"), Err(TypeSigError::EmptyName(_))));
        assert!(matches!(parse(""), Err(TypeSigError::EmptyName(_))));
        assert!(matches!(parse("a<b>.C"), Err(TypeSigError::InvalidMarker(_))));
    }
}
