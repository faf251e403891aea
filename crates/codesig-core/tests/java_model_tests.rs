use codesig_core::parser::MalformedTypePolicy;
use codesig_core::signature::AccessModifier;
use codesig_core::{parse_source, Language, TypeSig};

const MODEL: &str = r#"package ParserExamples.Samples;

/** A simple class to test parsing.
 * @since 2017-6-24
 */
protected class Model1Java {

    /** The modification count. */
    @MultiLineAnnotation("alpha-1",
        Double.TYPE ,
        3)
    private int mod;

    /** The name. */
    private String _name = "initial-name";

    /** The names. */
    public Map<Integer, String> Props;

    /** Set properties
     * @param props the properties
     * @return the properties
     */
    @SetterAnnotation(Prop = "Props", UriTemplate = "/SetProps?props={props}",
        ResponseFormat = WebMessageFormat.Json)
    public static Result<List<String>> SetProps(final List<String>[] props) {
        content of SetProps;
    }

    List<String> hiddenField;
}
"#;

fn generic(name: &str, params: Vec<TypeSig>) -> TypeSig {
    TypeSig {
        params,
        ..TypeSig::simple(name)
    }
}

#[test]
fn test_model_class() {
    let unit = parse_source("Model1Java.java", MODEL, &Language::Java.definition(), MalformedTypePolicy::SkipMember)
        .unwrap();
    assert_eq!(unit.blocks.len(), 1);
    assert_eq!(unit.namespaces, vec![vec!["ParserExamples".to_string(), "Samples".to_string()]]);

    let class = unit.block("ParserExamples.Samples.Model1Java").unwrap();
    assert_eq!(class.declaration, "class");
    assert_eq!(class.access, AccessModifier::NamespaceOrInheritanceLocal);
    assert!(class.comments[0].starts_with("A simple class to test parsing."));
}

#[test]
fn test_model_fields() {
    let unit = parse_source("Model1Java.java", MODEL, &Language::Java.definition(), MalformedTypePolicy::SkipMember)
        .unwrap();
    let class = &unit.blocks[0];
    let fields = &class.fields;
    assert_eq!(fields.len(), 4);

    assert_eq!(fields[0].full_name.join("."), "ParserExamples.Samples.Model1Java.mod");
    assert_eq!(fields[0].type_sig, TypeSig::simple("int"));
    assert_eq!(fields[0].comments, vec!["The modification count.".to_string()]);

    let annotation = &fields[0].annotations[0];
    assert_eq!(annotation.name, "MultiLineAnnotation");
    assert_eq!(annotation.argument("arg1"), Some("alpha-1"));
    assert_eq!(annotation.argument("arg2"), Some("Double.TYPE"));
    assert_eq!(annotation.argument("arg3"), Some("3"));

    assert_eq!(fields[1].name, "_name");
    assert_eq!(fields[1].type_sig, TypeSig::simple("String"));
    assert_eq!(
        fields[2].type_sig,
        generic("Map", vec![TypeSig::simple("Integer"), TypeSig::simple("String")])
    );
    assert_eq!(fields[3].name, "hiddenField");
    assert_eq!(fields[3].type_sig, generic("List", vec![TypeSig::simple("String")]));
}

#[test]
fn test_model_method() {
    let unit = parse_source("Model1Java.java", MODEL, &Language::Java.definition(), MalformedTypePolicy::SkipMember)
        .unwrap();
    let class = &unit.blocks[0];
    assert_eq!(class.methods.len(), 1);

    let method = &class.methods[0];
    assert_eq!(method.full_name.join("."), "ParserExamples.Samples.Model1Java.SetProps");
    assert!(method.comments[0].starts_with("Set properties"));
    assert!(method.comments[0].contains("@return the properties"));
    assert_eq!(
        method.return_type,
        generic("Result", vec![generic("List", vec![TypeSig::simple("String")])])
    );

    let param = &method.params[0];
    assert_eq!(param.name, "props");
    assert_eq!(param.type_sig.to_string(), "List<String>[]");
    assert_eq!(param.modifiers, vec!["final".to_string()]);

    let annotation = &method.annotations[0];
    assert_eq!(annotation.name, "SetterAnnotation");
    assert_eq!(annotation.argument("Prop"), Some("Props"));
    assert_eq!(annotation.argument("UriTemplate"), Some("/SetProps?props={props}"));
    assert_eq!(annotation.argument("ResponseFormat"), Some("WebMessageFormat.Json"));
}
