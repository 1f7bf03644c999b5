use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Paths {
    /// Directory of known-good `.scm` files used by the corpus tests.
    pub corpus: Option<PathBuf>,
}
