pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Converts `UserProfile` into `user_profile`.
pub fn snake_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 4);
    let mut previous_lower = false;
    for c in value.chars() {
        if c.is_uppercase() {
            if previous_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            previous_lower = false;
        } else if c == ' ' || c == '-' {
            if !result.ends_with('_') {
                result.push('_');
            }
            previous_lower = false;
        } else {
            result.push(c);
            previous_lower = c.is_alphanumeric();
        }
    }
    result
}

/// English plural good enough for table names derived from type names.
pub fn plural(value: &str) -> String {
    let lower = value.to_lowercase();
    if lower.ends_with('y')
        && !["ay", "ey", "iy", "oy", "uy"]
            .iter()
            .any(|v| lower.ends_with(v))
    {
        return format!("{}ies", &value[..value.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|v| lower.ends_with(v)) {
        return format!("{value}es");
    }
    format!("{value}s")
}

/// Name of the table for a type, `BlogPost` becomes `blog_posts`.
pub fn table_name_of(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let base = base.rsplit("::").next().unwrap_or(base);
    plural(&snake_case(base))
}

/// Cuts `value` to at most 497 bytes on a char boundary, marking the cut with `...`.
pub fn truncate(value: &str) -> std::borrow::Cow<'_, str> {
    const LIMIT: usize = 497;
    if value.len() <= LIMIT {
        return value.trim_end().into();
    }
    let mut end = LIMIT;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", value[..end].trim_end()).into()
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::truncate(&$query)
    };
}
