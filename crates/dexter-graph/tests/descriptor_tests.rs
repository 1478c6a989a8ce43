use super::*;

#[test]
fn test_parse_primitive_and_object_fields() {
    let int = parse_field_descriptor("I").expect("valid");
    assert_eq!(int.dimensions, 0);
    assert_eq!(int.base, BaseType::Primitive(PrimitiveKind::Int));

    let string = parse_field_descriptor("Ljava/lang/String;").expect("valid");
    assert_eq!(string.base, BaseType::Object("java/lang/String"));
}

#[test]
fn test_parse_array_dimensions() {
    let matrix = parse_field_descriptor("[[J").expect("valid");
    assert_eq!(matrix.dimensions, 2);
    assert_eq!(matrix.base, BaseType::Primitive(PrimitiveKind::Long));

    let objects = parse_field_descriptor("[Ljava/lang/Object;").expect("valid");
    assert_eq!(objects.dimensions, 1);
    assert_eq!(objects.base, BaseType::Object("java/lang/Object"));
}

#[test]
fn test_parse_method_descriptor() {
    let method = parse_method_descriptor("(IDLjava/lang/Thread;)Ljava/lang/Object;").expect("valid");
    assert_eq!(method.params.len(), 3);
    assert_eq!(method.params[0].base, BaseType::Primitive(PrimitiveKind::Int));
    assert_eq!(method.params[1].base, BaseType::Primitive(PrimitiveKind::Double));
    assert_eq!(method.params[2].base, BaseType::Object("java/lang/Thread"));
    assert_eq!(method.ret.base, BaseType::Object("java/lang/Object"));

    let no_args = parse_method_descriptor("()V").expect("valid");
    assert!(no_args.params.is_empty());
    assert!(no_args.ret.is_void());
}

#[test]
fn test_void_only_valid_as_return_type() {
    assert!(matches!(
        parse_field_descriptor("V"),
        Err(DescriptorError::VoidNotAllowed { .. })
    ));
    assert!(matches!(
        parse_method_descriptor("(V)V"),
        Err(DescriptorError::VoidNotAllowed { .. })
    ));
    assert!(matches!(
        parse_method_descriptor("()[V"),
        Err(DescriptorError::VoidNotAllowed { .. })
    ));
}

#[test]
fn test_malformed_descriptors() {
    assert_eq!(parse_field_descriptor(""), Err(DescriptorError::Empty));
    assert!(matches!(
        parse_field_descriptor("Ljava/lang/String"),
        Err(DescriptorError::UnterminatedClassName { .. })
    ));
    assert!(matches!(
        parse_field_descriptor("L;"),
        Err(DescriptorError::UnexpectedChar { offset: 1, .. })
    ));
    assert!(matches!(
        parse_field_descriptor("Q"),
        Err(DescriptorError::UnexpectedChar { offset: 0, .. })
    ));
    assert!(matches!(
        parse_field_descriptor("II"),
        Err(DescriptorError::TrailingInput { offset: 1, .. })
    ));
    assert!(matches!(
        parse_method_descriptor("I)V"),
        Err(DescriptorError::MissingParameterList { .. })
    ));
    assert!(matches!(
        parse_method_descriptor("(I"),
        Err(DescriptorError::MissingParameterList { .. })
    ));
    assert!(matches!(
        parse_method_descriptor("(I)"),
        Err(DescriptorError::UnexpectedChar { offset: 3, .. })
    ));
}

#[test]
fn test_dimension_limit() {
    let at_limit = format!("{}I", "[".repeat(MAX_ARRAY_DIMENSIONS));
    assert_eq!(
        parse_field_descriptor(&at_limit).expect("valid").dimensions as usize,
        MAX_ARRAY_DIMENSIONS
    );

    let over_limit = format!("{}I", "[".repeat(MAX_ARRAY_DIMENSIONS + 1));
    assert!(matches!(
        parse_field_descriptor(&over_limit),
        Err(DescriptorError::TooManyDimensions { .. })
    ));
}

#[test]
fn test_error_display_names_descriptor() {
    let err = parse_field_descriptor("Lfoo").expect_err("unterminated");
    assert_eq!(err.to_string(), "unterminated class name in descriptor `Lfoo`");
}
