/// Uppercases the first character; attribute names and values are normalized
/// with this on every write.
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_ascii() {
        assert_eq!(capitalize_first_letter("color"), "Color");
    }

    #[test]
    fn leaves_already_capitalized_input_alone() {
        assert_eq!(capitalize_first_letter("Size"), "Size");
    }

    #[test]
    fn handles_empty_and_unicode() {
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(capitalize_first_letter("éclair"), "Éclair");
    }
}
