/// Builds the object key for an element: `tag` when `id` is empty, `tag#id` otherwise.
pub fn element_key(tag_name: &str, id: &str) -> String {
    if id.is_empty() {
        tag_name.to_string()
    } else {
        format!("{tag_name}#{id}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tag_with_id() {
        assert_eq!(element_key("div", "main"), "div#main");
    }

    #[test]
    fn test_tag_without_id() {
        assert_eq!(element_key("p", ""), "p");
    }

    #[test]
    fn test_empty_tag_with_id() {
        assert_eq!(element_key("", "test"), "#test");
    }

    #[test]
    fn test_empty_tag_without_id() {
        assert_eq!(element_key("", ""), "");
    }
}
