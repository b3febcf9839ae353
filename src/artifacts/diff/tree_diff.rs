use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashMap;

/// Flattened `(path, blob)` pairs of a tree
pub type FlatTree = Vec<(String, ObjectId)>;

/// Entries of `new` that are absent from `old` or point at a different blob
///
/// Paths only present in `old` are not reported: a picked commit adds and changes files
/// but never removes them.
pub fn introduced_changes(old: &[(String, ObjectId)], new: &[(String, ObjectId)]) -> FlatTree {
    let old = old
        .iter()
        .map(|(path, oid)| (path.as_str(), oid))
        .collect::<HashMap<_, _>>();

    new.iter()
        .filter(|(path, oid)| old.get(path.as_str()) != Some(&oid))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn entry(path: &str, fill: char) -> (String, ObjectId) {
        (path.to_string(), oid(fill))
    }

    #[test]
    fn reports_added_and_changed_paths_in_new_order() {
        let old = vec![entry("1.txt", '1'), entry("2.txt", '2'), entry("gone.txt", '9')];
        let new = vec![entry("1.txt", '1'), entry("2.txt", 'a'), entry("3.txt", '3')];

        assert_eq!(
            introduced_changes(&old, &new),
            vec![entry("2.txt", 'a'), entry("3.txt", '3')]
        );
    }

    #[test]
    fn root_commit_introduces_everything() {
        let new = vec![entry("A/5.txt", '5'), entry("main.txt", 'm')];
        assert_eq!(introduced_changes(&[], &new), new);
    }
}
