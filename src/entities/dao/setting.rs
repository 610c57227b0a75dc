/// A single key/value row in the `settings` table.
#[derive(Debug, Clone)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
