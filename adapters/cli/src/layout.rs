//! Board layout files: custom walls and target cells in TOML.
//!
//! ```toml
//! walls = ["3,4,right", "10,10,bottom"]
//! targets = ["4,11", "12,2"]
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use ricochet_core::ConfigurationDraft;

/// Reads and validates a layout file.
pub(crate) fn load(path: &Path) -> Result<ConfigurationDraft> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid layout file at {}", path.display()))
}

fn parse(contents: &str) -> Result<ConfigurationDraft> {
    let draft: ConfigurationDraft =
        toml::from_str(contents).context("failed to parse layout toml contents")?;
    draft.validate()?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use ricochet_core::{Cell, Side, Wall};

    use super::*;

    #[test]
    fn parses_walls_and_targets() {
        let draft = parse(
            r#"
walls = ["3,4,right", "10,10,bottom"]
targets = ["4,11", "12,2"]
"#,
        )
        .expect("layout parses");

        assert!(draft.walls.contains(&Wall::new(Cell::new(3, 4), Side::Right)));
        assert!(draft
            .walls
            .contains(&Wall::new(Cell::new(10, 10), Side::Bottom)));
        assert_eq!(
            draft.targets.iter().copied().collect::<Vec<_>>(),
            vec![Cell::new(4, 11), Cell::new(12, 2)]
        );
    }

    #[test]
    fn layout_without_targets_is_rejected() {
        let error = parse(r#"walls = ["3,4,right"]"#).expect_err("targets required");
        assert!(format!("{error:#}").contains("at least one target"));
    }

    #[test]
    fn center_targets_are_rejected() {
        let error = parse(r#"targets = ["7,8"]"#).expect_err("center rejected");
        assert!(format!("{error:#}").contains("center"));
    }

    #[test]
    fn malformed_cells_are_rejected() {
        assert!(parse(r#"targets = ["16,0"]"#).is_err());
        assert!(parse(r#"walls = ["1,1,diagonal"]"#).is_err());
    }
}
