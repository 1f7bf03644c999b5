use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Encoder {
    /// Section alignment used when writing files. The format default applies when unset.
    pub alignment: Option<u32>,
}
