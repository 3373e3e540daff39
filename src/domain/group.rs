/// A study group as listed by the group directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub member_count: usize,
}
