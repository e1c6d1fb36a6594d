use json2capella_types::{ElementKind, Layer, ScopePath};
use std::str::FromStr;

// ── ScopePath ─────────────────────────────────────────────────────

#[test]
fn root_path_is_empty() {
    let root = ScopePath::root();
    assert!(root.is_root());
    assert_eq!(root.depth(), 0);
    assert_eq!(root.name(), None);
    assert_eq!(root.parent(), None);
    assert_eq!(root.to_string(), "/");
}

#[test]
fn child_and_parent() {
    let pkg = ScopePath::root().child("Vehicles");
    let class = pkg.child("Vehicle");
    assert_eq!(class.depth(), 2);
    assert_eq!(class.name(), Some("Vehicle"));
    assert_eq!(class.parent(), Some(pkg.clone()));
    assert_eq!(pkg.parent(), Some(ScopePath::root()));
}

#[test]
fn display_joins_segments() {
    let p: ScopePath = ["Data Types", "uint8"].into_iter().collect();
    assert_eq!(p.to_string(), "/Data Types/uint8");
}

#[test]
fn join_appends_relative_path() {
    let base: ScopePath = ["Imported"].into_iter().collect();
    let rel: ScopePath = ["Sub", "Thing"].into_iter().collect();
    assert_eq!(base.join(&rel).segments(), ["Imported", "Sub", "Thing"]);
    assert_eq!(base.join(&ScopePath::root()), base);
}

#[test]
fn starts_with_ancestors_only() {
    let p: ScopePath = ["a", "b", "c"].into_iter().collect();
    assert!(p.starts_with(&ScopePath::root()));
    assert!(p.starts_with(&["a", "b"].into_iter().collect()));
    assert!(!p.starts_with(&["b"].into_iter().collect()));
}

#[test]
fn same_name_in_different_scopes_differs() {
    let a = ScopePath::root().child("A").child("Id");
    let b = ScopePath::root().child("B").child("Id");
    assert_ne!(a, b);
    assert_eq!(a.name(), b.name());
}

#[test]
fn scope_path_serializes_as_array() {
    let p: ScopePath = ["a", "b"].into_iter().collect();
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, r#"["a","b"]"#);
    let back: ScopePath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
}

// ── ElementKind ───────────────────────────────────────────────────

#[test]
fn kind_parse_and_display() {
    for kind in ElementKind::ALL {
        assert_eq!(ElementKind::from_str(kind.as_str()).unwrap(), kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
    assert!(ElementKind::from_str("interface").is_err());
}

#[test]
fn kind_serde_matches_as_str() {
    let json = serde_json::to_string(&ElementKind::EnumerationLiteral).unwrap();
    assert_eq!(json, "\"enumeration_literal\"");
}

#[test]
fn containers() {
    assert!(ElementKind::Package.is_container());
    assert!(ElementKind::Class.is_container());
    assert!(ElementKind::Enumeration.is_container());
    assert!(!ElementKind::Property.is_container());
    assert!(!ElementKind::PrimitiveType.is_container());
}

#[test]
fn property_types() {
    let types: Vec<ElementKind> = ElementKind::ALL
        .into_iter()
        .filter(ElementKind::is_type)
        .collect();
    assert_eq!(
        types,
        vec![
            ElementKind::Class,
            ElementKind::Enumeration,
            ElementKind::PrimitiveType
        ]
    );
    assert!(ElementKind::Class.is_classifier());
    assert!(!ElementKind::PrimitiveType.is_classifier());
    assert!(!ElementKind::Package.is_classifier());
}

// ── Layer ─────────────────────────────────────────────────────────

#[test]
fn layer_parse_is_case_insensitive() {
    assert_eq!(Layer::from_str("la").unwrap(), Layer::La);
    assert_eq!(Layer::from_str("SA").unwrap(), Layer::Sa);
    assert_eq!(Layer::from_str(" pa ").unwrap(), Layer::Pa);
}

#[test]
fn layer_parse_unknown() {
    let err = Layer::from_str("epbs").unwrap_err();
    assert!(err.to_string().contains("epbs"));
}

#[test]
fn layer_display_roundtrip() {
    for layer in Layer::ALL {
        assert_eq!(Layer::from_str(&layer.to_string()).unwrap(), layer);
        assert!(!layer.long_name().is_empty());
    }
}
