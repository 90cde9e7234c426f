//! Snapshot tests for complete Kotlin files.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use std::fs;

use kpoet::{
    AnnotationSpec, ClassName, CodeBlock, EnumConstant, FileSpec, FormatOptions, FunSpec, KModifier, ParameterSpec,
    ParameterizedTypeName, PropertySpec, TypeAliasSpec, TypeName, TypeSpec, names::kotlin,
};
use tempfile::TempDir;

const PACKAGE: &str = "com.example.shop";

fn constructor_property(name: &str, type_name: impl Into<TypeName>) -> PropertySpec {
    let mut builder = PropertySpec::builder(name, type_name);
    builder.initializer("%N", &[name.into()]).unwrap();
    builder.build().unwrap()
}

/// An enum, a data class, an extension function and an alias sharing one
/// package.
fn models_file() -> FileSpec {
    let status = ClassName::new(PACKAGE, "Status");
    let item = ClassName::new(PACKAGE, "Item");

    let mut status_enum = TypeSpec::enum_builder("Status");
    status_enum
        .add_enum_constant(EnumConstant::of("ACTIVE").unwrap())
        .add_enum_constant(EnumConstant::of("ARCHIVED").unwrap());

    let tags = ParameterizedTypeName::new(kotlin::list(), [TypeName::from(kotlin::string())]);
    let legacy = TypeName::from(ClassName::new("java.awt", "List")).with_nullable(true);
    let mut legacy_parameter = ParameterSpec::builder("legacy", legacy.clone());
    legacy_parameter.default_value("null", &[]).unwrap();

    let mut constructor = FunSpec::constructor_builder();
    constructor
        .add_parameter(ParameterSpec::of("id", kotlin::long()))
        .add_parameter(ParameterSpec::of("tags", tags.clone()))
        .add_parameter(legacy_parameter.build().unwrap());

    let mut item_class = TypeSpec::class_builder("Item");
    item_class
        .add_modifiers([KModifier::Data])
        .primary_constructor(constructor.build().unwrap())
        .unwrap()
        .add_property(constructor_property("id", kotlin::long()))
        .unwrap()
        .add_property(constructor_property("tags", tags))
        .unwrap()
        .add_property(constructor_property("legacy", legacy))
        .unwrap();

    let mut is_active = FunSpec::builder("isActive");
    is_active
        .receiver(item.clone(), None)
        .unwrap()
        .add_parameter(ParameterSpec::of("status", status.clone()))
        .returns(kotlin::boolean(), None)
        .unwrap()
        .add_statement("return status == %T.ACTIVE", &[status.into()])
        .unwrap();

    let index = ParameterizedTypeName::new(kotlin::map(), [TypeName::from(kotlin::long()), TypeName::from(item)]);

    let mut file = FileSpec::builder(PACKAGE, "Models");
    file.add_type(status_enum.build().unwrap())
        .add_type(item_class.build().unwrap())
        .add_function(is_active.build().unwrap())
        .unwrap()
        .add_type_alias(TypeAliasSpec::builder("ItemIndex", index).build().unwrap());
    file.build().unwrap()
}

#[test]
fn test_models_file() {
    insta::assert_snapshot!(models_file().render().unwrap(), @r#"
package com.example.shop

import kotlin.Boolean
import kotlin.Long
import kotlin.String
import kotlin.collections.Map

public enum class Status {
  ACTIVE,
  ARCHIVED,
}

public data class Item(
  public val id: Long,
  public val tags: kotlin.collections.List<String>,
  public val legacy: java.awt.List? = null,
)

public fun Item.isActive(status: Status): Boolean {
  return status == Status.ACTIVE
}

public typealias ItemIndex = Map<Long, Item>
"#);
}

#[test]
fn test_kdoc_with_comment_delimiters() {
    let mut parameter = ParameterSpec::builder("parameter", kotlin::double());
    parameter
        .add_kdoc("%L", &["Parameter Kdoc with comments\n/*\n".into()])
        .unwrap();
    let mut constructor = FunSpec::constructor_builder();
    constructor.add_parameter(parameter.build().unwrap());

    let mut property = PropertySpec::builder("property", kotlin::boolean());
    property
        .add_kdoc("Property Kdoc with comments: /* */.\n", &[])
        .unwrap()
        .initializer("false", &[])
        .unwrap();

    let mut some_class = TypeSpec::class_builder("SomeClass");
    some_class
        .add_kdoc("Start of a nested comment: /*\n", &[])
        .unwrap()
        .add_kdoc("[random][%T] reference\n", &[ClassName::new("java.util", "Random").into()])
        .unwrap()
        .add_kdoc("End of a nested comment: */\n", &[])
        .unwrap()
        .add_kdoc("%L", &[CodeBlock::of("Some comment in args: [%L].\n", &["*/".into()]).unwrap().into()])
        .unwrap()
        .primary_constructor(constructor.build().unwrap())
        .unwrap()
        .add_property(property.build().unwrap())
        .unwrap();

    let file = FileSpec::get("com.squareup.test", some_class.build().unwrap()).unwrap();
    insta::assert_snapshot!(file.to_string(), @r#"
package com.squareup.test

import kotlin.Boolean
import kotlin.Double

/**
 * Start of a nested comment: /&#42;
 * [random][java.util.Random] reference
 * End of a nested comment: &#42;/
 * Some comment in args: [&#42;/].
 *
 * @param parameter Parameter Kdoc with comments
 * /&#42;
 */
public class SomeClass(
  parameter: Double,
) {
  /**
   * Property Kdoc with comments: /&#42; &#42;/.
   */
  public val `property`: Boolean = false
}
"#);
}

#[test]
fn test_annotated_constructor_property() {
    let mut parameter = ParameterSpec::builder("value", kotlin::int());
    parameter
        .add_kdoc("The held value.\n", &[])
        .unwrap()
        .add_annotation(AnnotationSpec::of(ClassName::new("com.squareup.test", "Marker")));
    let mut constructor = FunSpec::constructor_builder();
    constructor.add_parameter(parameter.build().unwrap());

    let mut holder = TypeSpec::class_builder("Holder");
    holder
        .primary_constructor(constructor.build().unwrap())
        .unwrap()
        .add_property(constructor_property("value", kotlin::int()))
        .unwrap();

    let file = FileSpec::get("com.squareup.test", holder.build().unwrap()).unwrap();
    insta::assert_snapshot!(file.to_string(), @r#"
package com.squareup.test

import kotlin.Int

/**
 * @param value The held value.
 */
public class Holder(
  /**
   * The held value.
   */
  @Marker
  public val `value`: Int,
)
"#);
}

#[test]
fn test_options_from_toml() {
    let options = FormatOptions::from_toml_str("indent = { spaces = 4 }").unwrap();
    let file = models_file().to_builder().format_options(options).build().unwrap();
    let text = file.render().unwrap();
    assert!(text.contains("public enum class Status {\n    ACTIVE,\n    ARCHIVED,\n}\n"));
    assert!(text.contains("\n    return status == Status.ACTIVE\n"));
}

#[test]
fn test_rendering_is_deterministic() {
    let file = models_file();
    assert_eq!(file.render().unwrap(), file.render().unwrap());
    assert_eq!(file, file.to_builder().build().unwrap());
}

#[test]
fn test_source_unit() {
    let file = models_file();
    let unit = file.to_source_unit().unwrap();
    assert_eq!(unit.location(), "com/example/shop/Models.kt");
    assert_eq!(unit.content(), file.render().unwrap());
    assert_eq!(unit.bytes(), file.render().unwrap().as_bytes());
}

#[test]
fn test_write_to_dir() {
    let temp = TempDir::new().unwrap();
    let file = models_file();

    let path = file.write_to_dir(temp.path()).unwrap();
    assert_eq!(path, temp.path().join("com/example/shop/Models.kt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), file.render().unwrap());
}

#[test]
fn test_write_to_dir_rejects_files() {
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("plain");
    fs::write(&not_a_dir, "x").unwrap();

    let err = models_file().write_to_dir(&not_a_dir).unwrap_err();
    assert!(err.to_string().contains("is not a directory"));
}
