// src/main.rs
use iced::widget::{button, container, scrollable, text, Column, Row};
use iced::{executor, theme, window, Application, Command, Element, Length, Settings, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod cloud_handler;
mod data_types;
mod error;
mod export;
mod loader;
mod logging;
mod panel;
mod secrets;
mod ui;

use cloud_handler::CloudHandler;
use data_types::{LoaderConfig, TableSnapshot};
use error::LoadError;
use loader::{load_shared, refresh_shared, RemoteTableLoader, SharedLoader};
use panel::{PanelState, EXPORT_LABEL, LOADING_LABEL, REFRESH_LABEL, TITLE};
use secrets::SecretStore;
use ui::PALETTE;

const TABLE_HEIGHT: f32 = 600.0;
const FIRST_COLUMN_WIDTH: f32 = 220.0;
const COLUMN_WIDTH: f32 = 140.0;

pub fn main() -> iced::Result {
    logging::init();

    let loader = RemoteTableLoader::new(
        LoaderConfig::default(),
        CloudHandler::new(SecretStore::default()),
    );
    let config = loader.config().clone();
    info!(
        spreadsheet = %config.spreadsheet_id,
        worksheet = %config.worksheet_name,
        ttl = ?config.ttl,
        "starting price panel"
    );

    let flags = PanelFlags {
        loader: loader.into_shared(),
        worksheet_name: config.worksheet_name,
    };

    PricePanel::run(Settings {
        window: window::Settings {
            size: (1024, 768),
            ..Default::default()
        },
        ..Settings::with_flags(flags)
    })
}

struct PanelFlags {
    loader: SharedLoader<CloudHandler>,
    worksheet_name: String,
}

struct PricePanel {
    loader: SharedLoader<CloudHandler>,
    worksheet_name: String,
    state: Option<PanelState>,
    loading: bool,
    export_status: Option<Result<PathBuf, String>>,
}

#[derive(Debug, Clone)]
enum Message {
    Loaded(Result<Arc<TableSnapshot>, LoadError>),
    RefreshRequested,
    ExportRequested,
    Exported(Option<Result<PathBuf, String>>),
}

impl Application for PricePanel {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = PanelFlags;

    fn new(flags: PanelFlags) -> (Self, Command<Message>) {
        let panel = PricePanel {
            loader: flags.loader,
            worksheet_name: flags.worksheet_name,
            state: None,
            loading: true,
            export_status: None,
        };
        let initial_load = Command::perform(load_shared(Arc::clone(&panel.loader)), Message::Loaded);

        (panel, initial_load)
    }

    fn title(&self) -> String {
        TITLE.to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Loaded(result) => {
                self.loading = false;
                self.state = Some(PanelState::from_load(result));
                Command::none()
            }

            Message::RefreshRequested => {
                if self.loading {
                    return Command::none();
                }
                info!("refresh requested");
                self.loading = true;
                self.export_status = None;

                Command::perform(refresh_shared(Arc::clone(&self.loader)), Message::Loaded)
            }

            Message::ExportRequested => {
                let Some(state) = &self.state else {
                    return Command::none();
                };
                let snapshot = Arc::clone(&state.snapshot);
                let file_name = export::suggested_file_name(&self.worksheet_name, &snapshot);

                Command::perform(
                    async move {
                        let handle = match rfd::AsyncFileDialog::new()
                            .add_filter("CSV", &["csv"])
                            .set_file_name(file_name.as_str())
                            .save_file()
                            .await
                        {
                            Some(handle) => handle,
                            None => return None,
                        };

                        let path = handle.path().to_path_buf();
                        Some(
                            export::export_csv(snapshot, path)
                                .await
                                .map_err(|e| e.to_string()),
                        )
                    },
                    Message::Exported,
                )
            }

            Message::Exported(outcome) => {
                if let Some(Err(e)) = &outcome {
                    error!("csv export failed: {}", e);
                }
                self.export_status = outcome;
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let mut content = Column::new()
            .spacing(16)
            .padding(24)
            .push(text(TITLE).size(32).style(PALETTE.fg));

        let Some(state) = &self.state else {
            return content
                .push(text(LOADING_LABEL).style(PALETTE.muted_fg))
                .into();
        };

        if state.shows_table() {
            content = content
                .push(
                    text(state.subheader(&self.worksheet_name))
                        .size(22)
                        .style(PALETTE.fg),
                )
                .push(self.render_table(&state.snapshot))
                .push(
                    text(state.updated_caption())
                        .size(14)
                        .style(PALETTE.muted_fg),
                );
        }

        for banner in &state.banners {
            content = content.push(text(banner.text()).style(PALETTE.banner_color(banner)));
        }

        let refresh = button(text(REFRESH_LABEL)).padding(10);
        let mut actions = Row::new()
            .spacing(10)
            .push(if self.loading {
                refresh
            } else {
                refresh.on_press(Message::RefreshRequested)
            });
        if state.shows_table() {
            actions = actions.push(
                button(text(EXPORT_LABEL))
                    .padding(10)
                    .on_press(Message::ExportRequested),
            );
        }
        content = content.push(actions);

        if self.loading {
            content = content.push(text(LOADING_LABEL).style(PALETTE.muted_fg));
        }

        match &self.export_status {
            Some(Ok(path)) => {
                content = content.push(
                    text(format!("Arquivo salvo em {}", path.display()))
                        .size(14)
                        .style(PALETTE.success_fg),
                );
            }
            Some(Err(e)) => {
                content = content.push(
                    text(format!("Falha ao salvar o CSV: {}", e))
                        .size(14)
                        .style(PALETTE.error_fg),
                );
            }
            None => {}
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl PricePanel {
    fn render_table(&self, snapshot: &TableSnapshot) -> Element<Message> {
        let headers = Row::with_children(
            snapshot
                .headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    container(text(header).style(PALETTE.fg))
                        .width(column_width(i))
                        .padding(6)
                        .style(theme::Container::Box)
                        .into()
                })
                .collect(),
        )
        .spacing(1);

        let rows = snapshot.rows.iter().map(|row| {
            Row::with_children(
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        container(text(cell).style(PALETTE.fg))
                            .width(column_width(i))
                            .padding(6)
                            .into()
                    })
                    .collect(),
            )
            .spacing(1)
            .into()
        });

        let body = Column::with_children(rows.collect()).spacing(1);

        Column::new()
            .push(headers)
            .push(scrollable(body).height(Length::Fixed(TABLE_HEIGHT)))
            .spacing(1)
            .into()
    }
}

fn column_width(index: usize) -> Length {
    if index == 0 {
        Length::Fixed(FIRST_COLUMN_WIDTH)
    } else {
        Length::Fixed(COLUMN_WIDTH)
    }
}
