use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::profile::MachineCatalog;
use crate::summary::Summary;

pub fn tabulate_summary(summary: &Summary) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(26))),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["Statistic".into(), "Value".into()],
        ));
    let rows: Vec<(&str, String)> = vec![
        ("Sample size", format!("{}", summary.sample)),
        ("Avg. REG games", format!("{:.1}", summary.avg_reg_game)),
        ("Avg. AT games", format!("{:.1}", summary.avg_at_game)),
        ("Avg. REG coins", format!("{:.1}", summary.avg_reg_coin)),
        ("Avg. AT coins", format!("{:.1}", summary.avg_at_coin)),
        ("Expected spins to hit", format!("{:.1}", summary.first_hit)),
        ("Net coin differential", format!("{:+.1}", summary.avg_diff)),
        ("Coins in", format!("{:.1}", summary.avg_in)),
        ("Coins out", format!("{:.1}", summary.avg_out)),
        ("Payout rate", format!("{:.2}%", summary.payout)),
        ("Expected value", format!("{:+.0} yen", summary.expected_value)),
    ];
    for (label, value) in rows {
        table.push_row(Row::new(
            Styles::default(),
            vec![label.into(), value.into()],
        ));
    }
    table
}

pub fn tabulate_catalog(catalog: &MachineCatalog) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(28))),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "Id".into(),
                "Machine".into(),
                "Margin".into(),
                "Coin ret.".into(),
                "Floor".into(),
                "Policy".into(),
            ],
        ));
    for (id, profile) in catalog.sorted() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                id.into(),
                profile.display_name.clone().into(),
                format!("{}", profile.exclude_games).into(),
                format!("{:.1}", profile.coin_moti).into(),
                format!("{}", profile.min_sample).into(),
                profile.policy.to_string().into(),
            ],
        ));
    }
    table
}
