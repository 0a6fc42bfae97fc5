/// Upload area and result cards
use iced::widget::image::Handle;
use iced::widget::{button, column, container, progress_bar, row, text, Column};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::{band_color, card, muted, severity_color, truncate_name};
use crate::state::data::{ItemView, Severity, UploadStatus};
use crate::Message;

const CARD_WIDTH: f32 = 300.0;

pub fn view(items: &[ItemView], drag_active: bool) -> Element<'static, Message> {
    let mut page = Column::new().spacing(24).push(upload_area(drag_active));

    if !items.is_empty() {
        let cards: Vec<Element<'static, Message>> = items.iter().map(result_card).collect();
        page = page.push(card(
            column![
                row![
                    text("Classification Results").size(20).width(Length::Fill),
                    button(text("Clear All"))
                        .on_press(Message::ClearAll)
                        .style(button::danger),
                ]
                .align_y(Alignment::Center),
                Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0),
            ]
            .spacing(16),
        ));
    }

    page.push(guidelines()).into()
}

fn upload_area(drag_active: bool) -> Element<'static, Message> {
    let hint = if drag_active {
        "Release to upload"
    } else {
        "Drop images here or choose files"
    };

    let drop_zone = container(
        column![
            text(hint).size(18),
            text("Supports JPEG, PNG, and WebP formats").size(13).color(muted()),
            row![
                button(text("Choose Files")).on_press(Message::ChooseFiles).padding([10, 20]),
                button(text("Import Folder"))
                    .on_press(Message::ImportFolder)
                    .style(button::secondary)
                    .padding([10, 20]),
            ]
            .spacing(12),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .padding(32)
    .width(Length::Fill)
    .center_x(Length::Fill)
    .style(if drag_active {
        container::bordered_box
    } else {
        container::rounded_box
    });

    card(
        column![
            text("Upload Poultry Images").size(24),
            text("Upload images of poultry for AI-powered disease classification")
                .color(muted()),
            drop_zone,
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .into()
}

fn result_card(item: &ItemView) -> Element<'static, Message> {
    let preview = iced::widget::image(Handle::from_path(&item.preview_path))
        .width(Length::Fill)
        .height(Length::Fixed(180.0))
        .content_fit(ContentFit::Cover);

    let title = row![
        text(truncate_name(&item.name)).size(14).width(Length::Fill),
        button(text("✕")).on_press(Message::Remove(item.id)).style(button::danger),
    ]
    .align_y(Alignment::Center);

    let details = text(format!(
        "{} · {:.1} KB",
        item.media_type,
        item.size_bytes as f32 / 1024.0
    ))
    .size(12)
    .color(muted());

    let body: Element<'static, Message> = match &item.status {
        UploadStatus::Pending => text("Processing...").size(13).color(muted()).into(),
        UploadStatus::Complete(result) => {
            let marker = if result.disease.severity == Severity::High {
                "⚠"
            } else {
                "✔"
            };
            column![
                row![
                    text(format!("{marker} {}", result.disease.name))
                        .color(severity_color(result.disease.severity))
                        .width(Length::Fill),
                    text(format!("{:.1}%", result.confidence * 100.0)).size(14),
                ],
                progress_bar(0.0..=100.0, result.confidence * 100.0)
                    .height(Length::Fixed(8.0))
                    .style({
                        let color = band_color(result.band());
                        move |theme: &iced::Theme| progress_bar::Style {
                            bar: color.into(),
                            ..progress_bar::primary(theme)
                        }
                    }),
                text(result.disease.description).size(13).color(muted()),
                text(format!("Classified at {}", result.completed_at.format("%H:%M:%S")))
                    .size(12)
                    .color(muted()),
            ]
            .spacing(8)
            .into()
        }
    };

    container(column![preview, title, details, body].spacing(10))
        .padding(12)
        .width(Length::Fixed(CARD_WIDTH))
        .style(container::bordered_box)
        .into()
}

fn tips(heading: &'static str, lines: [&'static str; 4]) -> Column<'static, Message> {
    lines.into_iter().fold(
        Column::new().spacing(4).push(text(heading).size(15)),
        |list, line| list.push(text(format!("• {line}")).size(13)),
    )
}

fn guidelines() -> Element<'static, Message> {
    card(
        column![
            text("Classification Guidelines").size(18),
            row![
                tips(
                    "Image Quality Tips:",
                    [
                        "Use clear, well-lit images",
                        "Focus on affected areas",
                        "Avoid blurry or dark photos",
                        "Include multiple angles if possible",
                    ],
                )
                .width(Length::Fill),
                tips(
                    "Best Results:",
                    [
                        "High resolution images (min 300x300px)",
                        "Close-up shots of symptoms",
                        "Natural lighting preferred",
                        "Clean background when possible",
                    ],
                )
                .width(Length::Fill),
            ]
            .spacing(24),
        ]
        .spacing(12),
    )
    .into()
}
