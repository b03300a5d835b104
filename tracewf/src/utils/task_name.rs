//! Dependency encoding carried in composite task names.
//!
//! `M5_3_4`: the leading letter is dropped, the first `_` token (`5`) is the
//! task's own type and the rest (`3`, `4`) are the types of its parents.
//! Names starting with `task` carry no encoding.

const UNENCODED_PREFIX: &str = "task";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedName<'a> {
    pub own_type: &'a str,
    pub parent_types: Vec<&'a str>,
}

pub fn is_encoded(task_name: &str) -> bool {
    !task_name.starts_with(UNENCODED_PREFIX)
}

pub fn decode(task_name: &str) -> Option<DecodedName<'_>> {
    if !is_encoded(task_name) {
        return None;
    }

    let mut chars = task_name.chars();
    chars.next()?;
    let mut tokens = chars.as_str().split('_');

    let own_type = tokens.next().filter(|t| !t.is_empty())?;
    let parent_types = tokens.filter(|t| !t.is_empty()).collect();

    Some(DecodedName {
        own_type,
        parent_types,
    })
}
