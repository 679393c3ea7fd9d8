//! Naming-convention conversion for component names

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase,
};
use tracing::warn;

/// Convert `input` to the case named by `case_name`
///
/// Unknown case names leave the input untouched.
pub fn convert_case(input: &str, case_name: &str) -> String {
    match case_name {
        "snake_case" | "snake" => input.to_snake_case(),
        "kebab-case" | "kebab" => input.to_kebab_case(),
        "camelCase" | "camel" => input.to_lower_camel_case(),
        "PascalCase" | "pascal" | "UpperCamelCase" => input.to_upper_camel_case(),
        "SCREAMING_SNAKE_CASE" | "screaming" => input.to_shouty_snake_case(),
        "lowercase" => input.to_lowercase(),
        "UPPERCASE" => input.to_uppercase(),
        other => {
            warn!(case = other, "unknown name case, keeping '{}' as-is", input);
            input.to_string()
        }
    }
}
