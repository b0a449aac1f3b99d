use crate::config::{Amount, CostSpec};
use serde::Serialize;

/// One installment of the bimonthly fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    #[serde(rename = "periodo")]
    pub period: String,
    #[serde(rename = "importo")]
    pub amount: Amount,
    #[serde(rename = "scadenza")]
    pub due: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    #[serde(rename = "bimestri")]
    pub bimesters: Vec<[String; 2]>,
    #[serde(rename = "numero_bimestri")]
    pub bimester_count: u32,
    #[serde(rename = "costo_totale")]
    pub total: Amount,
    #[serde(rename = "dettaglio_pagamenti")]
    pub payments: Vec<Payment>,
}

/// Pair the included months two by two and bill each pair once.
///
/// A trailing month without a partner is not billed.
pub fn calculate_costs(spec: &CostSpec) -> CostSummary {
    let bimesters: Vec<[String; 2]> = spec
        .mesi_inclusi
        .chunks_exact(2)
        .map(|pair| [pair[0].clone(), pair[1].clone()])
        .collect();

    let payments = bimesters
        .iter()
        .map(|[first, second]| Payment {
            period: format!("{first}-{second}"),
            amount: spec.quota_bimestrale,
            due: format!("inizio {first}"),
        })
        .collect();

    let bimester_count = bimesters.len() as u32;
    CostSummary {
        bimesters,
        bimester_count,
        total: spec.quota_bimestrale * bimester_count,
        payments,
    }
}
