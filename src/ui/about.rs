use iced::widget::{column, row, text, Column};
use iced::{Alignment, Element, Length};

use super::{card, muted};
use crate::Message;

const FEATURES: [(&str, &str); 4] = [
    (
        "Advanced AI Technology",
        "Powered by state-of-the-art transfer learning models for accurate disease classification.",
    ),
    (
        "Early Disease Detection",
        "Identify diseases before they spread, protecting entire flocks from outbreaks.",
    ),
    (
        "Real-time Analysis",
        "Get instant results with our optimized deep learning inference pipeline.",
    ),
    (
        "Expert Validated",
        "Developed in collaboration with veterinary experts and poultry health specialists.",
    ),
];

const ACHIEVEMENTS: [(&str, &str); 4] = [
    ("94.2%", "Classification Accuracy"),
    ("2,847+", "Images Analyzed"),
    ("156", "Diseases Detected"),
    ("24/7", "Monitoring Available"),
];

const IMPACT: [(&str, &str); 3] = [
    (
        "Disease Prevention",
        "Early detection prevents disease spread, reducing mortality rates by up to 60%",
    ),
    (
        "Smart Decision Making",
        "AI-powered insights enable data-driven treatment decisions and resource optimization",
    ),
    (
        "Enhanced Productivity",
        "Improved flock health leads to increased egg production and better meat quality",
    ),
];

fn titled(title: &'static str, body: &'static str) -> Column<'static, Message> {
    column![text(title).size(17), text(body).size(14).color(muted())].spacing(6)
}

fn bullets(heading: &'static str, lines: [&'static str; 3]) -> Column<'static, Message> {
    lines.into_iter().fold(
        Column::new().spacing(4).push(text(heading).size(16)),
        |list, line| list.push(text(format!("• {line}")).size(13)),
    )
}

pub fn view() -> Element<'static, Message> {
    let hero = card(
        column![
            text("Transfer Learning-Based Classification").size(28),
            text("of Poultry Diseases for Enhanced Health").size(18).color(muted()),
            text(
                "The platform applies transfer learning to classify poultry diseases from \
                 photographs, enabling early detection and proactive flock health management.",
            )
            .size(15),
            text("Deep Learning · Computer Vision · Veterinary AI").size(13).color(muted()),
        ]
        .spacing(10),
    );

    let achievements = ACHIEVEMENTS.into_iter().fold(row![].spacing(16), |cards, (metric, label)| {
        cards.push(card(
            column![text(metric).size(26), text(label).size(13).color(muted())]
                .spacing(4)
                .align_x(Alignment::Center),
        ))
    });

    let features = FEATURES.into_iter().fold(row![].spacing(16), |cards, (title, body)| {
        cards.push(card(titled(title, body)))
    });

    let approach = card(
        column![
            text("Technical Approach").size(20),
            row![
                bullets(
                    "Transfer Learning Architecture",
                    [
                        "Pre-trained on ImageNet dataset",
                        "Fine-tuned on poultry disease dataset",
                        "Optimized for real-time inference",
                    ],
                )
                .width(Length::Fill),
                bullets(
                    "Disease Classification Pipeline",
                    [
                        "Image augmentation and normalization",
                        "Multi-scale feature extraction",
                        "Ensemble prediction voting",
                    ],
                )
                .width(Length::Fill),
            ]
            .spacing(24),
        ]
        .spacing(12),
    );

    let impact = IMPACT.into_iter().fold(
        Column::new().spacing(12).push(text("Impact & Benefits").size(20)),
        |list, (title, body)| list.push(titled(title, body)),
    );

    column![hero, achievements, features, approach, card(impact)]
        .spacing(24)
        .into()
}
