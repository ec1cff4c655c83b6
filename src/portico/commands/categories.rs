use crate::categories::subcategories;
use crate::commands::CmdResult;
use crate::model::MainCategory;

/// The subcategory vocabulary, for one main category or all of them.
pub fn run(main: Option<MainCategory>) -> CmdResult {
    let mains: Vec<MainCategory> = match main {
        Some(main) => vec![main],
        None => MainCategory::ALL.to_vec(),
    };
    CmdResult {
        categories: mains.into_iter().map(|m| (m, subcategories(m))).collect(),
        ..Default::default()
    }
}
