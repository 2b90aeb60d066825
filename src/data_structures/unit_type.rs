use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Identifier of a unit type, e.g. `ARMAMD`, `CORHP` or `CREDRAG`.
///
/// Comparison and hashing ignore ASCII case, so ids read from different
/// files (`UnitName=ArmCom;` vs. `armcom`) key the same model.
#[derive(Clone, Debug)]
pub struct UnitTypeId {
    name: String,
    key: String,
}

impl UnitTypeId {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        Self { name, key }
    }

    /// The name as it was spelled where it was read.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for UnitTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for UnitTypeId {}

impl Hash for UnitTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl From<&str> for UnitTypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for UnitTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
