//! Forwards a document's client options to the emitter.

use crate::{config::ClientOptions, emit::ClientGeneratorSettings};

/// Copies each option that's set into the same-named setting.
macro_rules! forward {
    ($from:expr => $to:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$from.$field {
                $to.$field = value.clone().into();
            }
        )+
    };
}

/// Maps client options onto emitter settings.
///
/// Options that aren't set keep the emitter's defaults. Four type options
/// also apply to the shared code generator settings, like NSwag does.
pub fn map_options(options: &ClientOptions) -> ClientGeneratorSettings {
    let mut settings = ClientGeneratorSettings::default();

    forward!(options => settings;
        class_name,
        client_base_class,
        client_base_interface,
        client_class_access_modifier,
        configuration_class,
        exception_class,
        response_class,
        http_client_type,
        additional_namespace_usages,
        additional_contract_namespace_usages,
        protected_methods,
        checksum_cache_enabled,
        dispose_http_client,
        inject_http_client,
        use_base_url,
        use_http_client_creation_method,
        use_http_request_message_creation_method,
        use_request_and_response_serialization_settings,
        serialize_type_information,
        expose_json_serializer_settings,
        wrap_dto_exceptions,
        wrap_responses,
        wrap_response_methods,
        query_null_value,
        parameter_array_type,
        parameter_date_format,
        parameter_date_time_format,
        parameter_dictionary_type,
        response_array_type,
        response_dictionary_type,
        excluded_parameter_names,
        generate_optional_parameters,
        generate_base_url_property,
        generate_client_classes,
        generate_client_interfaces,
        generate_dto_types,
        generate_exception_classes,
        generate_prepare_request_and_process_response_as_async_methods,
        generate_response_classes,
        generate_sync_methods,
        generate_update_json_serializer_settings_method,
    );

    forward!(options => settings.types;
        namespace,
        type_access_modifier,
        class_style,
        template_directory,
        excluded_type_names,
        json_converters,
        generate_nullable_reference_types,
        generate_optional_properties_as_nullable,
        generate_data_annotations,
        generate_default_values,
        generate_immutable_array_properties,
        generate_immutable_dictionary_properties,
        generate_json_methods,
        enforce_flag_enums,
        handle_references,
        inline_named_any,
        inline_named_arrays,
        inline_named_dictionaries,
        inline_named_tuples,
        required_properties_must_be_defined,
        any_type,
        array_type,
        array_base_type,
        array_instance_type,
        dictionary_type,
        dictionary_base_type,
        dictionary_instance_type,
        date_type,
        date_time_type,
        time_type,
        time_span_type,
    );

    forward!(options => settings.code;
        excluded_type_names,
        inline_named_any,
        generate_default_values,
        template_directory,
    );

    settings
}
