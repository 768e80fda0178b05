//! Layout CLI commands.
//!
//! Each command loads the widget registry, opens the file persistence
//! backend and runs the layout engine for one room. Writes queued by a
//! mutation are flushed before the command returns.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::types::CliContainer;
use crate::cli::output;
use crate::config;
use crate::error::RoomdeckError;
use crate::modules::widgets::{
    Container, FilePersistence, LayoutStore, PersistenceBridge, PersistenceWorker, RoomId,
    StaticRegistry, WidgetId, WidgetRegistry,
};

/// Maximum characters of a widget name shown in tables.
const NAME_COLUMN_WIDTH: usize = 32;

/// Layout command arguments.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Widget registry file (`{ "<room id>": [widget, ...] }`).
    ///
    /// Defaults to `storage.registry` from the configuration.
    #[arg(long, global = true, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Directory holding persisted room layouts.
    ///
    /// Defaults to `storage.layoutsDir` from the configuration.
    #[arg(long, global = true, value_name = "DIR")]
    pub layouts_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: LayoutCommands,
}

/// Layout subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum LayoutCommands {
    /// List the rooms of the registry.
    ///
    /// Shows how many widgets each room has and whether any are pinned or
    /// maximized.
    Rooms {
        /// Output in JSON format instead of table format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Show the layout of a room.
    #[command(after_long_help = r"Examples:
  roomdeck layout show '!abc:example.org'
  roomdeck layout show '!abc:example.org' --json")]
    Show {
        /// Room identifier.
        room: String,

        /// Output in JSON format instead of table format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Move a widget into a container.
    ///
    /// Moving into `center` sends the currently maximized widget to `right`.
    /// Moving into a full `top` fails.
    #[command(after_long_help = r"Examples:
  roomdeck layout move '!abc:example.org' etherpad top
  roomdeck layout move '!abc:example.org' jitsi center")]
    Move {
        /// Room identifier.
        room: String,

        /// Widget identifier.
        widget: String,

        /// Destination container.
        #[arg(value_enum)]
        container: CliContainer,
    },

    /// Move a widget to a position within its container.
    Reorder {
        /// Room identifier.
        room: String,

        /// Container holding the widget.
        #[arg(value_enum)]
        container: CliContainer,

        /// Widget identifier.
        widget: String,

        /// 0-based target position (clamped to the container).
        index: usize,
    },

    /// Set or clear the height of the pinned strip.
    Height {
        /// Room identifier.
        room: String,

        /// Height in percent of the room view.
        #[arg(required_unless_present = "clear")]
        height: Option<u32>,

        /// Reset the height to the default.
        #[arg(long, conflicts_with = "height")]
        clear: bool,
    },

    /// Show or set the resizer positions of the pinned strip.
    ///
    /// Positions are cumulative percentages, one fewer than the number of
    /// pinned widgets.
    #[command(after_long_help = r"Examples:
  roomdeck layout distributions '!abc:example.org'
  roomdeck layout distributions '!abc:example.org' --set 30%,70%")]
    Distributions {
        /// Room identifier.
        room: String,

        /// New resizer positions, comma separated.
        #[arg(long, value_delimiter = ',', value_name = "POSITIONS")]
        set: Option<Vec<String>>,
    },

    /// Write the complete layout of a room, effective widths included.
    Copy {
        /// Room identifier.
        room: String,
    },
}

/// Execute layout subcommands.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or a mutation is rejected.
pub fn execute(args: &LayoutArgs) -> Result<(), RoomdeckError> {
    let mut session = LayoutSession::open(args)?;

    match &args.command {
        LayoutCommands::Rooms { json } => session.print_rooms(*json),
        LayoutCommands::Show { room, json } => session.print_layout(&RoomId::from(room.as_str()), *json),
        LayoutCommands::Move { room, widget, container } => {
            let room = RoomId::from(room.as_str());
            let widget = session.known_widget(&room, widget)?;
            session.store.move_to_container(&room, &widget, (*container).into())?;
            session.finish(&format!("Moved {widget} to {container}"));
            Ok(())
        }
        LayoutCommands::Reorder { room, container, widget, index } => {
            let room = RoomId::from(room.as_str());
            let widget = session.known_widget(&room, widget)?;
            if session.store.move_within_container(&room, (*container).into(), &widget, *index) {
                session.finish(&format!("Moved {widget} to position {index} of {container}"));
            } else {
                println!("{}", "Nothing to reorder".dimmed());
            }
            Ok(())
        }
        LayoutCommands::Height { room, height, clear } => {
            let room = RoomId::from(room.as_str());
            let height = if *clear { None } else { *height };
            session.store.set_container_height(&room, Container::Top, height)?;
            session.finish(&height.map_or_else(
                || "Cleared pinned height".to_string(),
                |height| format!("Set pinned height to {height}%"),
            ));
            Ok(())
        }
        LayoutCommands::Distributions { room, set } => {
            let room = RoomId::from(room.as_str());
            if let Some(positions) = set {
                session.store.set_resizer_distributions(&room, Container::Top, positions)?;
                session.finish("Updated resizer positions");
            }
            let distributions = session.store.get_resizer_distributions(&room, Container::Top);
            output::print_highlighted_json(&serde_json::to_value(distributions)?);
            Ok(())
        }
        LayoutCommands::Copy { room } => {
            let room = RoomId::from(room.as_str());
            session.store.copy_layout_to_room(&room);
            session.finish(&format!("Copied layout of {room}"));
            Ok(())
        }
    }
}

/// A store wired to the registry file and the layouts directory.
struct LayoutSession {
    registry: Arc<StaticRegistry>,
    store: LayoutStore,
    worker: PersistenceWorker,
}

impl LayoutSession {
    fn open(args: &LayoutArgs) -> Result<Self, RoomdeckError> {
        let storage = &config::get_config().storage;
        let registry_path = args.registry.clone().unwrap_or_else(|| storage.registry());
        let layouts_dir = args.layouts_dir.clone().unwrap_or_else(|| storage.layouts_dir());

        let registry = StaticRegistry::from_file(&registry_path).map_err(|err| {
            RoomdeckError::InvalidArguments(format!(
                "Failed to load widget registry {}: {err}",
                registry_path.display()
            ))
        })?;
        let registry = Arc::new(registry);
        tracing::debug!(
            registry = %registry_path.display(),
            layouts = %layouts_dir.display(),
            "opening layout store"
        );

        let (bridge, worker) = PersistenceBridge::new(Arc::new(FilePersistence::new(layouts_dir)));
        let mut store = LayoutStore::new(registry.clone(), bridge);
        store.start();

        Ok(Self { registry, store, worker })
    }

    /// Resolve a widget id, rejecting widgets the room does not have.
    fn known_widget(&mut self, room: &RoomId, widget: &str) -> Result<WidgetId, RoomdeckError> {
        let widget = WidgetId::from(widget);
        if self.store.room_layout(room).contains(&widget) {
            Ok(widget)
        } else {
            Err(RoomdeckError::InvalidArguments(format!(
                "Widget '{widget}' is not attached to room {room}"
            )))
        }
    }

    /// Flush queued writes and report success.
    fn finish(&mut self, message: &str) {
        let written = self.worker.drain();
        tracing::debug!(written, "flushed layout writes");
        println!("{} {message}", "✓".green());
    }

    fn print_rooms(&mut self, json: bool) -> Result<(), RoomdeckError> {
        let rows: Vec<RoomRow> = self
            .registry
            .visible_rooms()
            .into_iter()
            .map(|room| {
                let widgets = self.store.room_layout(&room).widget_count();
                RoomRow {
                    pinned: format_flag(self.store.has_pinned_widgets(&room), json),
                    maximized: format_flag(self.store.has_maximised_widget(&room), json),
                    room: room.to_string(),
                    widgets,
                }
            })
            .collect();

        if json {
            output::print_highlighted_json(&serde_json::to_value(&rows)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No rooms found in the widget registry.");
            return Ok(());
        }

        println!("{} {}\n", "Rooms:".bold(), rows.len());
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::one(1)).with(Alignment::right()))
            .to_string();
        println!("{table}");
        Ok(())
    }

    fn print_layout(&mut self, room: &RoomId, json: bool) -> Result<(), RoomdeckError> {
        let names: std::collections::HashMap<WidgetId, String> = self
            .registry
            .widgets_for_room(room)
            .into_iter()
            .map(|widget| (widget.id, widget.name))
            .collect();

        let layout = self.store.room_layout(room).clone();
        let effective = layout.effective_top_widths();

        let mut rows = Vec::with_capacity(layout.widget_count());
        for container in Container::ALL {
            for (index, id) in layout.widgets(container).iter().enumerate() {
                let width = (container == Container::Top)
                    .then(|| effective.get(index).copied())
                    .flatten();
                rows.push(WidgetRow {
                    container,
                    index: container.is_ordered().then_some(index),
                    widget: id.to_string(),
                    name: output::truncate(
                        names.get(id).map_or("", String::as_str),
                        NAME_COLUMN_WIDTH,
                    ),
                    width: width.map(|width| format!("{width:.1}%")),
                });
            }
        }

        if json {
            let value = serde_json::json!({
                "room": room,
                "height": layout.top_height(),
                "distributions": self.store.get_resizer_distributions(room, Container::Top),
                "widgets": rows,
            });
            output::print_highlighted_json(&value);
            return Ok(());
        }

        if rows.is_empty() {
            println!("Room {room} has no widgets.");
            return Ok(());
        }

        println!("{} {room}", "Room:".bold());
        if let Some(height) = layout.top_height() {
            println!("{} {height}%", "Pinned height:".bold());
        }
        println!();

        let table_rows: Vec<WidgetTableRow> = rows.into_iter().map(WidgetTableRow::from).collect();
        let table = Table::new(table_rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::one(1)).with(Alignment::right()))
            .with(Modify::new(Columns::last()).with(Alignment::right()))
            .to_string();
        println!("{table}");
        Ok(())
    }
}

/// Formats a flag for table output, or as a plain word for JSON.
fn format_flag(value: bool, json: bool) -> String {
    if json { value.to_string() } else { output::format_bool(value) }
}

/// One widget of a room.
#[derive(Serialize)]
struct WidgetRow {
    container: Container,
    index: Option<usize>,
    widget: String,
    name: String,
    width: Option<String>,
}

#[derive(Tabled)]
struct WidgetTableRow {
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Widget")]
    widget: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Width")]
    width: String,
}

impl From<WidgetRow> for WidgetTableRow {
    fn from(row: WidgetRow) -> Self {
        Self {
            container: output::format_container(row.container),
            index: row.index.map_or_else(|| "-".to_string(), |index| index.to_string()),
            widget: row.widget,
            name: row.name,
            width: row.width.unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Serialize, Tabled)]
struct RoomRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Widgets")]
    widgets: usize,
    #[tabled(rename = "Pinned")]
    pinned: String,
    #[tabled(rename = "Maximized")]
    maximized: String,
}
