//! BCRA 貨幣統計變數清單 (estadisticas/v4.0/monetarias)

use serde::Serialize;

pub const UNKNOWN_VARIABLE_LABEL: &str = "Unknown Variable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableCatalogEntry {
    pub value: i64,
    pub name: &'static str,
}

const fn entry(value: i64, name: &'static str) -> VariableCatalogEntry {
    VariableCatalogEntry { value, name }
}

pub static VARIABLE_CATALOG: &[VariableCatalogEntry] = &[
    entry(
        1,
        "Reservas Internacionales del BCRA (en millones de dólares - cifras provisorias sujetas a cambio de valuación)",
    ),
    entry(
        4,
        "Tipo de Cambio Minorista ($ por USD) Comunicación B 9791 - Promedio vendedor",
    ),
    entry(
        5,
        "Tipo de Cambio Mayorista ($ por USD) Comunicación A 3500 - Referencia",
    ),
    entry(6, "Tasa de Política Monetaria (en % n.a.)"),
    entry(7, "BADLAR en pesos de bancos privados (en % n.a.)"),
    entry(8, "TM20 en pesos de bancos privados (en % n.a.)"),
    entry(
        9,
        "Tasas de interés de las operaciones de pase activas para el BCRA, a 1 día de plazo (en % n.a.)",
    ),
    entry(
        10,
        "Tasas de interés de las operaciones de pase pasivas para el BCRA, a 1 día de plazo (en % n.a.)",
    ),
    entry(
        11,
        "Tasas de interés por préstamos entre entidades financiera privadas (BAIBAR) (en % n.a.)",
    ),
    entry(
        12,
        "Tasas de interés por depósitos a 30 días de plazo en entidades financieras (en % n.a.)",
    ),
    entry(
        13,
        "Tasa de interés de préstamos por adelantos en cuenta corriente",
    ),
    entry(14, "Tasa de interés de préstamos personales"),
    entry(15, "Base monetaria - Total (en millones de pesos)"),
    entry(16, "Circulación monetaria (en millones de pesos)"),
    entry(17, "Billetes y monedas en poder del público (en millones de pesos)"),
    entry(18, "Efectivo en entidades financieras (en millones de pesos)"),
    entry(
        19,
        "Depósitos de las entidades financieras en cuenta corriente en el BCRA (en millones de pesos)",
    ),
    entry(
        21,
        "Depósitos en efectivo en las entidades financieras - Total (en millones de pesos)",
    ),
    entry(
        22,
        "En cuentas corrientes (neto de utilización FUCO) (en millones de pesos)",
    ),
    entry(23, "En Caja de ahorros (en millones de pesos)"),
    entry(
        24,
        "A plazo (incluye inversiones y excluye CEDROS) (en millones de pesos)",
    ),
    entry(
        25,
        "M2 privado, promedio móvil de 30 días, variación interanual (en %)",
    ),
    entry(
        26,
        "Préstamos de las entidades financieras al sector privado (en millones de pesos)",
    ),
    entry(27, "Inflación mensual (variación en %)"),
    entry(28, "Inflación interanual (variación en % i.a.)"),
    entry(
        29,
        "Inflación esperada - REM próximos 12 meses - MEDIANA (variación en % i.a)",
    ),
    entry(30, "CER (Base 2.2.2002=1)"),
    entry(31, "Unidad de Valor Adquisitivo (UVA) (en pesos -con dos decimales-, base 31.3.2016=14.05)"),
    entry(32, "Unidad de Vivienda (UVI) (en pesos -con dos decimales-, base 31.3.2016=14.05)"),
    entry(34, "Tasa de Política Monetaria (en % e.a.)"),
    entry(35, "BADLAR en pesos de bancos privados (en % e.a.)"),
    entry(40, "Índice para Contratos de Locación (ICL-Ley 27.551, con dos decimales, base 30.6.20=1)"),
];

pub fn find_variable(id: i64) -> Option<&'static VariableCatalogEntry> {
    VARIABLE_CATALOG.iter().find(|entry| entry.value == id)
}

/// 找不到時回傳 UNKNOWN_VARIABLE_LABEL，不視為錯誤
pub fn variable_label(id: i64) -> &'static str {
    find_variable(id)
        .map(|entry| entry.name)
        .unwrap_or(UNKNOWN_VARIABLE_LABEL)
}

pub fn variable_options() -> &'static [VariableCatalogEntry] {
    VARIABLE_CATALOG
}
