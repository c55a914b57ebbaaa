/// Input for adding a master vaccine definition.
#[derive(Debug, Clone)]
pub struct AddVaccineCommand {
    pub name: Option<String>,
    pub age_in_weeks: Option<u32>,
    /// Defaults to true when not given
    pub is_default: Option<bool>,
}
