use serde::Deserialize;

use crate::emit::ClassStyle;

/// The `openApiToCSharpClient` section of an NSwag document.
///
/// Every field is optional: an absent field means "use the emitter's
/// default", and is never given a default here. Unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientOptions {
    // Client shape.
    pub class_name: Option<String>,
    pub client_base_class: Option<String>,
    pub client_base_interface: Option<String>,
    pub client_class_access_modifier: Option<String>,
    pub configuration_class: Option<String>,
    pub exception_class: Option<String>,
    pub response_class: Option<String>,
    pub http_client_type: Option<String>,
    pub additional_namespace_usages: Option<Vec<String>>,
    pub additional_contract_namespace_usages: Option<Vec<String>>,
    pub protected_methods: Option<Vec<String>>,

    // Client behavior.
    pub checksum_cache_enabled: Option<bool>,
    pub dispose_http_client: Option<bool>,
    pub inject_http_client: Option<bool>,
    pub use_base_url: Option<bool>,
    pub use_http_client_creation_method: Option<bool>,
    pub use_http_request_message_creation_method: Option<bool>,
    pub use_request_and_response_serialization_settings: Option<bool>,
    pub serialize_type_information: Option<bool>,
    pub expose_json_serializer_settings: Option<bool>,
    pub wrap_dto_exceptions: Option<bool>,
    pub wrap_responses: Option<bool>,
    pub wrap_response_methods: Option<Vec<String>>,
    pub query_null_value: Option<String>,

    // Parameters and responses.
    pub parameter_array_type: Option<String>,
    pub parameter_date_format: Option<String>,
    pub parameter_date_time_format: Option<String>,
    pub parameter_dictionary_type: Option<String>,
    pub response_array_type: Option<String>,
    pub response_dictionary_type: Option<String>,
    pub excluded_parameter_names: Option<Vec<String>>,

    // What to generate.
    pub generate_optional_parameters: Option<bool>,
    pub generate_base_url_property: Option<bool>,
    pub generate_client_classes: Option<bool>,
    pub generate_client_interfaces: Option<bool>,
    pub generate_dto_types: Option<bool>,
    pub generate_exception_classes: Option<bool>,
    pub generate_prepare_request_and_process_response_as_async_methods: Option<bool>,
    pub generate_response_classes: Option<bool>,
    pub generate_sync_methods: Option<bool>,
    pub generate_update_json_serializer_settings_method: Option<bool>,

    // Types.
    pub namespace: Option<String>,
    pub type_access_modifier: Option<String>,
    pub class_style: Option<ClassStyle>,
    pub template_directory: Option<String>,
    pub excluded_type_names: Option<Vec<String>>,
    pub json_converters: Option<Vec<String>>,
    pub generate_nullable_reference_types: Option<bool>,
    pub generate_optional_properties_as_nullable: Option<bool>,
    pub generate_data_annotations: Option<bool>,
    pub generate_default_values: Option<bool>,
    pub generate_immutable_array_properties: Option<bool>,
    pub generate_immutable_dictionary_properties: Option<bool>,
    pub generate_json_methods: Option<bool>,
    pub enforce_flag_enums: Option<bool>,
    pub handle_references: Option<bool>,
    pub inline_named_any: Option<bool>,
    pub inline_named_arrays: Option<bool>,
    pub inline_named_dictionaries: Option<bool>,
    pub inline_named_tuples: Option<bool>,
    pub required_properties_must_be_defined: Option<bool>,
    pub any_type: Option<String>,
    pub array_type: Option<String>,
    pub array_base_type: Option<String>,
    pub array_instance_type: Option<String>,
    pub dictionary_type: Option<String>,
    pub dictionary_base_type: Option<String>,
    pub dictionary_instance_type: Option<String>,
    pub date_type: Option<String>,
    pub date_time_type: Option<String>,
    pub time_type: Option<String>,
    pub time_span_type: Option<String>,
}
