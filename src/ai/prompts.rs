use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::total_balance;
use crate::models::{Goal, Transaction};

const INSIGHT_SAMPLE: usize = 15;

pub(crate) const RECEIPT_PROMPT: &str = "Extract receipt info: date (YYYY-MM-DD), total value \
(number, negative if expense), store name, short description. Return ONLY a JSON with keys: \
date, value, merchant, description.";

/// Reply used instead of calling the model when there is nothing to plan.
pub(crate) const NO_GOALS_REPLY: &str =
    "Crie pelo menos uma meta para que eu possa te ajudar com o planejamento!";

#[derive(Serialize)]
struct InsightRow<'a> {
    data: &'a str,
    historico: &'a str,
    valor: Decimal,
    origem: &'a str,
}

#[derive(Serialize)]
struct GoalRow<'a> {
    titulo: &'a str,
    alvo: Decimal,
    atual: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalPlan<'a> {
    metas: Vec<GoalRow<'a>>,
    saldo_estimado: Decimal,
}

/// Spending advice over the most recent transactions.
pub(crate) fn insights_prompt(txns: &[Transaction]) -> serde_json::Result<String> {
    let mut recent: Vec<&Transaction> = txns.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let rows: Vec<InsightRow<'_>> = recent
        .into_iter()
        .take(INSIGHT_SAMPLE)
        .map(|t| InsightRow {
            data: &t.date,
            historico: &t.description,
            valor: t.amount,
            origem: &t.origin,
        })
        .collect();

    Ok(format!(
        "Você é um consultor financeiro experiente. Analise brevemente estes dados financeiros \
         (em PT-BR) e dê 3 conselhos práticos e objetivos:\n\n{}\n\nSeja conciso e direto.",
        serde_json::to_string_pretty(&rows)?
    ))
}

/// Action plan for the user's goals, or `None` when there are no goals.
pub(crate) fn goals_prompt(goals: &[Goal], txns: &[Transaction]) -> serde_json::Result<Option<String>> {
    if goals.is_empty() {
        return Ok(None);
    }
    let plan = GoalPlan {
        metas: goals
            .iter()
            .map(|g| GoalRow {
                titulo: &g.title,
                alvo: g.target_amount,
                atual: g.current_amount,
            })
            .collect(),
        saldo_estimado: total_balance(txns),
    };
    Ok(Some(format!(
        "Analise minhas metas financeiras e sugira um plano de ação:\n\n{}\n\nForneça 3 passos realistas.",
        serde_json::to_string_pretty(&plan)?
    )))
}

/// Drop the markdown fences models like to wrap JSON in.
pub(crate) fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
