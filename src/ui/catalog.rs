/// Disease database tab: search box, severity filter and disease cards
use iced::widget::{column, container, pick_list, row, text, text_input, Column};
use iced::{Alignment, Element, Length};

use super::{card, muted, severity_color};
use crate::state::catalog::Catalog;
use crate::state::data::{Disease, SeverityFilter};
use crate::Message;

pub fn view<'a>(catalog: &Catalog, query: &'a str, severity: SeverityFilter) -> Element<'a, Message> {
    let controls = card(
        column![
            text("Disease Database").size(24),
            text("Reference information for common poultry diseases").color(muted()),
            row![
                text_input("Search diseases...", query)
                    .on_input(Message::QueryChanged)
                    .padding(10)
                    .width(Length::Fill),
                pick_list(SeverityFilter::OPTIONS, Some(severity), Message::SeverityChanged)
                    .padding(10),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(12),
    );

    let matches = catalog.search(query, severity);

    let results: Element<'a, Message> = if matches.is_empty() {
        card(
            column![
                text("No diseases found").size(18),
                text("Try adjusting your search terms or filters").color(muted()),
            ]
            .spacing(6)
            .align_x(Alignment::Center),
        )
        .into()
    } else {
        matches
            .into_iter()
            .fold(Column::new().spacing(16), |list, disease| {
                list.push(disease_card(disease))
            })
            .into()
    };

    column![controls, results].spacing(24).into()
}

fn disease_card<'a>(disease: &'static Disease) -> Element<'a, Message> {
    let color = severity_color(disease.severity);

    let badge = container(text(format!("{} Risk", disease.severity)).size(12).color(color))
        .padding([4, 10])
        .style(container::bordered_box);

    let symptoms = disease.symptoms.iter().fold(
        Column::new().spacing(2).push(text("Symptoms").size(15)),
        |list, symptom| list.push(text(format!("• {symptom}")).size(13)),
    );

    card(
        column![
            row![
                text(disease.name).size(20).width(Length::Fill),
                badge,
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            text(format!("Prevalence: {:.1}% of cases", disease.prevalence))
                .size(13)
                .color(muted()),
            text(disease.description).size(14),
            row![
                symptoms.width(Length::Fill),
                column![
                    text("Treatment").size(15),
                    text(disease.treatment).size(13),
                ]
                .spacing(2)
                .width(Length::Fill),
            ]
            .spacing(24),
        ]
        .spacing(10),
    )
    .into()
}
