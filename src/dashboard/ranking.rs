//! The top expense categories, drawn as HTML progress bars.

use maud::{Markup, html};

use crate::{
    grouping::{group_sum, percent_of, top_n},
    html::{CARD_STYLE, EMPTY_STATE_STYLE, format_currency},
    record::TransactionRecord,
};

/// The number of categories shown in the ranking.
pub(super) const RANKING_SIZE: usize = 5;

const RANK_COLORS: [&str; RANKING_SIZE] = ["#d97757", "#f97316", "#eab308", "#22c55e", "#3b82f6"];

/// An expense category's place in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RankedCategory {
    pub name: String,
    pub total: f64,
    /// Share of all expenses in the filtered records.
    pub share_pct: f64,
    /// Bar width relative to the largest category.
    pub width_pct: f64,
}

/// The `n` expense categories with the largest totals, largest first.
pub(super) fn rank_expense_categories(
    records: &[TransactionRecord],
    n: usize,
) -> Vec<RankedCategory> {
    let expenses_by_category = group_sum(
        records.iter().filter(|record| record.is_expense()),
        |record| record.category().to_owned(),
        TransactionRecord::amount,
    );
    let total_expense = expenses_by_category.total();
    let top = top_n(&expenses_by_category, n);
    let largest = top.first().map_or(0.0, |(_, total)| *total);

    top.into_iter()
        .map(|(name, total)| RankedCategory {
            name,
            total,
            share_pct: percent_of(total, total_expense),
            width_pct: percent_of(total, largest),
        })
        .collect()
}

pub(super) fn ranking_view(ranking: &[RankedCategory]) -> Markup {
    html! {
        div id="category-ranking" class=(CARD_STYLE)
        {
            div class="flex items-center justify-between mb-4"
            {
                h3 class="text-lg font-semibold" { "Spending ranking" }
                span class="text-xs text-gray-500 dark:text-gray-400" { "Top 5 categories" }
            }

            @if ranking.is_empty() {
                div class=(EMPTY_STATE_STYLE) { "No expenses in this period" }
            } @else {
                ol class="space-y-5"
                {
                    @for (index, category) in ranking.iter().enumerate() {
                        @let color = RANK_COLORS[index % RANK_COLORS.len()];

                        li class="space-y-2"
                        {
                            div class="flex items-center justify-between"
                            {
                                div class="flex items-center gap-3"
                                {
                                    span
                                        class="w-6 h-6 rounded-lg flex items-center justify-center text-xs font-bold"
                                        style={"color: " (color) ";"}
                                    {
                                        (index + 1)
                                    }
                                    span class="text-sm font-medium" { (category.name) }
                                }

                                div class="text-right"
                                {
                                    p class="text-sm font-semibold" { (format_currency(category.total)) }
                                    p class="text-xs text-gray-500 dark:text-gray-400"
                                    {
                                        (format!("{:.1}%", category.share_pct))
                                    }
                                }
                            }

                            div class="h-2 bg-gray-200 dark:bg-gray-700 rounded-full overflow-hidden"
                            {
                                div
                                    class="h-full rounded-full"
                                    style={
                                        "width: " (format!("{:.1}", category.width_pct)) "%; "
                                        "background-color: " (color) ";"
                                    }
                                {}
                            }
                        }
                    }
                }
            }
        }
    }
}
