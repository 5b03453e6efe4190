use docmap_bson::TextMode;
use docmap_core::{ElementNaming, MapperOptions, ModelOptions, TranslatorOptions};

#[test]
fn defaults() {
    let options = MapperOptions::default();
    assert_eq!(options.model.element_naming, ElementNaming::AsIs);
    assert!(options.model.discover_primary_key);
    assert!(!options.translator.log_sensitive_data);
    assert_eq!(options.translator.log_text_mode, TextMode::Native);
}

#[test]
fn loads_from_toml_with_omitted_fields() {
    let options: MapperOptions = toml::from_str(
        r#"
        [model]
        element_naming = "camel_case"

        [translator]
        log_sensitive_data = true
        log_text_mode = "strict"
        "#,
    )
    .unwrap();
    assert_eq!(
        options,
        MapperOptions {
            model: ModelOptions {
                element_naming: ElementNaming::CamelCase,
                discover_primary_key: true,
            },
            translator: TranslatorOptions {
                log_sensitive_data: true,
                log_text_mode: TextMode::Strict,
            },
        }
    );
}

#[test]
fn loads_from_json() {
    let options: MapperOptions =
        serde_json::from_str(r#"{"model": {"element_naming": "title_case", "discover_primary_key": false}}"#).unwrap();
    assert_eq!(options.model.element_naming, ElementNaming::TitleCase);
    assert!(!options.model.discover_primary_key);
    assert_eq!(options.translator, TranslatorOptions::default());

    let empty: MapperOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, MapperOptions::default());
}

#[test]
fn unknown_naming_is_rejected() {
    assert!(serde_json::from_str::<ModelOptions>(r#"{"element_naming": "kebab"}"#).is_err());
}

#[test]
fn naming_conventions_apply_to_element_names() {
    assert_eq!(ElementNaming::AsIs.apply("OrderId"), "OrderId");
    assert_eq!(ElementNaming::CamelCase.apply("OrderId"), "orderId");
    assert_eq!(ElementNaming::TitleCase.apply("order_id"), "OrderId");
}
