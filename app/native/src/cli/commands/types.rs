//! Shared types for CLI commands.

use crate::modules::widgets::Container;

/// Widget container (CLI representation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliContainer {
    /// Pinned strip, at most three widgets.
    Top,
    /// Maximized widget.
    Center,
    /// Sidebar.
    Right,
}

impl From<CliContainer> for Container {
    fn from(container: CliContainer) -> Self {
        match container {
            CliContainer::Top => Self::Top,
            CliContainer::Center => Self::Center,
            CliContainer::Right => Self::Right,
        }
    }
}

impl std::fmt::Display for CliContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Container::from(*self).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_container_maps_to_container() {
        assert_eq!(Container::from(CliContainer::Top), Container::Top);
        assert_eq!(Container::from(CliContainer::Center), Container::Center);
        assert_eq!(Container::from(CliContainer::Right), Container::Right);
    }

    #[test]
    fn test_cli_container_display() {
        assert_eq!(CliContainer::Center.to_string(), "center");
    }
}
