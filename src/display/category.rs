//! Category list formatting

/// Numbered category list, in display order
pub fn format_category_list(categories: &[String]) -> String {
    if categories.is_empty() {
        return "No categories defined.\n\nRun 'notebook category reset' to restore the defaults.\n"
            .to_string();
    }

    let width = categories.len().to_string().len();
    categories
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{:>width$}. {}\n", i + 1, name, width = width))
        .collect()
}
