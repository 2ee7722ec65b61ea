//! Translate a [`TransformSpec`] into conversion arguments.

use vf_core::TransformSpec;

/// Build the ordered argument list for one conversion.
///
/// Each option becomes `-{key}` followed by its value tokens, in spec order.
/// The reserved `format` key is skipped; option names are not validated and
/// unknown ones surface as engine errors.
pub fn build_convert_args(spec: &TransformSpec) -> Vec<String> {
    let mut args = Vec::with_capacity(spec.len() * 2);
    for (key, value) in spec.options() {
        args.push(format!("-{key}"));
        args.extend(value.tokens());
    }
    args
}
