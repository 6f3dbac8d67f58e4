use serde::Deserialize;

/// Settings for [`ClientGenerator`](super::ClientGenerator).
///
/// Names follow the NSwag client generator. The emitter renders Rust, so
/// settings without a Rust counterpart are accepted and carried, but don't
/// change the output. Type settings hold Rust type paths; anything that
/// doesn't parse as a Rust type falls back to the default.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientGeneratorSettings {
    pub class_name: String,
    pub client_base_class: Option<String>,
    pub client_base_interface: Option<String>,
    pub client_class_access_modifier: String,
    pub configuration_class: Option<String>,
    pub exception_class: String,
    pub response_class: String,
    pub http_client_type: String,
    pub additional_namespace_usages: Vec<String>,
    pub additional_contract_namespace_usages: Vec<String>,
    pub protected_methods: Vec<String>,
    pub checksum_cache_enabled: bool,
    pub dispose_http_client: bool,
    pub inject_http_client: bool,
    pub use_base_url: bool,
    pub use_http_client_creation_method: bool,
    pub use_http_request_message_creation_method: bool,
    pub use_request_and_response_serialization_settings: bool,
    pub serialize_type_information: bool,
    pub expose_json_serializer_settings: bool,
    pub wrap_dto_exceptions: bool,
    pub wrap_responses: bool,
    pub wrap_response_methods: Vec<String>,
    pub query_null_value: String,
    pub parameter_array_type: String,
    pub parameter_date_format: String,
    pub parameter_date_time_format: String,
    pub parameter_dictionary_type: String,
    pub response_array_type: String,
    pub response_dictionary_type: String,
    pub excluded_parameter_names: Vec<String>,
    pub generate_optional_parameters: bool,
    pub generate_base_url_property: bool,
    pub generate_client_classes: bool,
    pub generate_client_interfaces: bool,
    pub generate_dto_types: bool,
    pub generate_exception_classes: bool,
    pub generate_prepare_request_and_process_response_as_async_methods: bool,
    pub generate_response_classes: bool,
    pub generate_sync_methods: bool,
    pub generate_update_json_serializer_settings_method: bool,
    pub types: TypeSettings,
    pub code: CodeGeneratorSettings,
}

impl Default for ClientGeneratorSettings {
    fn default() -> Self {
        Self {
            class_name: "{controller}Client".to_owned(),
            client_base_class: None,
            client_base_interface: None,
            client_class_access_modifier: "public".to_owned(),
            configuration_class: None,
            exception_class: "ApiException".to_owned(),
            response_class: "SwaggerResponse".to_owned(),
            http_client_type: "::reqwest::Client".to_owned(),
            additional_namespace_usages: vec![],
            additional_contract_namespace_usages: vec![],
            protected_methods: vec![],
            checksum_cache_enabled: false,
            dispose_http_client: true,
            inject_http_client: true,
            use_base_url: true,
            use_http_client_creation_method: false,
            use_http_request_message_creation_method: false,
            use_request_and_response_serialization_settings: false,
            serialize_type_information: false,
            expose_json_serializer_settings: false,
            wrap_dto_exceptions: true,
            wrap_responses: false,
            wrap_response_methods: vec![],
            query_null_value: String::new(),
            parameter_array_type: VEC.to_owned(),
            parameter_date_format: "%Y-%m-%d".to_owned(),
            parameter_date_time_format: "%+".to_owned(),
            parameter_dictionary_type: BTREE_MAP.to_owned(),
            response_array_type: VEC.to_owned(),
            response_dictionary_type: BTREE_MAP.to_owned(),
            excluded_parameter_names: vec![],
            generate_optional_parameters: false,
            generate_base_url_property: true,
            generate_client_classes: true,
            generate_client_interfaces: false,
            generate_dto_types: true,
            generate_exception_classes: true,
            generate_prepare_request_and_process_response_as_async_methods: false,
            generate_response_classes: true,
            generate_sync_methods: false,
            generate_update_json_serializer_settings_method: true,
            types: TypeSettings::default(),
            code: CodeGeneratorSettings::default(),
        }
    }
}

/// Settings for generated DTO types.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeSettings {
    pub namespace: String,
    pub type_access_modifier: String,
    pub class_style: ClassStyle,
    pub template_directory: Option<String>,
    pub excluded_type_names: Vec<String>,
    pub json_converters: Vec<String>,
    pub generate_nullable_reference_types: bool,
    pub generate_optional_properties_as_nullable: bool,
    pub generate_data_annotations: bool,
    pub generate_default_values: bool,
    pub generate_immutable_array_properties: bool,
    pub generate_immutable_dictionary_properties: bool,
    pub generate_json_methods: bool,
    pub enforce_flag_enums: bool,
    pub handle_references: bool,
    pub inline_named_any: bool,
    pub inline_named_arrays: bool,
    pub inline_named_dictionaries: bool,
    pub inline_named_tuples: bool,
    pub required_properties_must_be_defined: bool,
    pub any_type: String,
    pub array_type: String,
    pub array_base_type: String,
    pub array_instance_type: String,
    pub dictionary_type: String,
    pub dictionary_base_type: String,
    pub dictionary_instance_type: String,
    pub date_type: String,
    pub date_time_type: String,
    pub time_type: String,
    pub time_span_type: String,
}

impl Default for TypeSettings {
    fn default() -> Self {
        Self {
            namespace: "MyNamespace".to_owned(),
            type_access_modifier: "public".to_owned(),
            class_style: ClassStyle::default(),
            template_directory: None,
            excluded_type_names: vec![],
            json_converters: vec![],
            generate_nullable_reference_types: false,
            generate_optional_properties_as_nullable: false,
            generate_data_annotations: true,
            generate_default_values: true,
            generate_immutable_array_properties: false,
            generate_immutable_dictionary_properties: false,
            generate_json_methods: false,
            enforce_flag_enums: false,
            handle_references: false,
            inline_named_any: false,
            inline_named_arrays: false,
            inline_named_dictionaries: false,
            inline_named_tuples: true,
            required_properties_must_be_defined: true,
            any_type: "::serde_json::Value".to_owned(),
            array_type: VEC.to_owned(),
            array_base_type: VEC.to_owned(),
            array_instance_type: VEC.to_owned(),
            dictionary_type: BTREE_MAP.to_owned(),
            dictionary_base_type: BTREE_MAP.to_owned(),
            dictionary_instance_type: BTREE_MAP.to_owned(),
            date_type: "::chrono::NaiveDate".to_owned(),
            date_time_type: "::chrono::DateTime<::chrono::Utc>".to_owned(),
            time_type: "::chrono::NaiveTime".to_owned(),
            time_span_type: "::std::time::Duration".to_owned(),
        }
    }
}

/// Settings shared by every NSwag code generator.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CodeGeneratorSettings {
    pub excluded_type_names: Vec<String>,
    pub inline_named_any: bool,
    pub generate_default_values: bool,
    pub template_directory: Option<String>,
}

/// How DTO types are shaped.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub enum ClassStyle {
    #[default]
    Poco,
    Inpc,
    Prism,
    Record,
}

const VEC: &str = "::std::vec::Vec";
const BTREE_MAP: &str = "::std::collections::BTreeMap";
