use chrono::NaiveDate;
use freelance_tax_core::config::{default_slabs, TaxSlab};
use freelance_tax_core::engine::TaxEngine;
use freelance_tax_core::fiscal::{current_financial_year, quarter_from_date, FixedClock};
use freelance_tax_core::gst::calculator::{self, GstInput, SupplyType};
use freelance_tax_core::income_tax::advance_tax::{self, AdvanceTaxInput};
use freelance_tax_core::income_tax::regime::{self, TaxComparisonInput, TaxScheme};
use freelance_tax_core::income_tax::slabs::progressive_tax;
use freelance_tax_core::{FreelanceTaxError, Money, TaxRegimeConfig, MAX_AMOUNT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn engine_on(y: i32, m: u32, d: u32) -> TaxEngine<FixedClock> {
    TaxEngine::with_clock(TaxRegimeConfig::default(), FixedClock(date(y, m, d))).unwrap()
}

// ===========================================================================
// Scheme comparison
// ===========================================================================

#[test]
fn test_ten_lakh_receipts() {
    let r = engine_on(2024, 5, 1).calculate_tax(dec!(1_000_000), false);

    // 44ADA: 5,00,000 - 50,000 = 4,50,000 -> 1,50,000 at 5% = 7,500 + cess
    assert_eq!(r.section_44ada_income, dec!(500_000));
    assert_eq!(r.section_44ada_taxable_income, dec!(450_000));
    assert_eq!(r.section_44ada_tax, dec!(7800));

    // Regular: 10,00,000 - 1,00,000 - 50,000 = 8,50,000
    assert_eq!(r.regular_taxable_income, dec!(850_000));
    assert_eq!(r.regular_tax, dec!(36400));

    assert_eq!(r.recommended_scheme, TaxScheme::Section44ada);
    assert_eq!(r.final_tax, dec!(7800));
    assert_eq!(r.savings, dec!(28600));

    let amounts: Vec<Money> = r.advance_tax_schedule.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![dec!(1170), dec!(3510), dec!(5850), dec!(7800)]);
}

#[test]
fn test_zero_income_is_all_zero() {
    let r = engine_on(2024, 5, 1).calculate_tax(Decimal::ZERO, false);
    assert_eq!(r.section_44ada_tax, Decimal::ZERO);
    assert_eq!(r.regular_tax, Decimal::ZERO);
    assert_eq!(r.savings, Decimal::ZERO);
    assert_eq!(r.recommended_scheme, TaxScheme::Section44ada);
    assert!(r.advance_tax_schedule.iter().all(|p| p.amount.is_zero()));
}

#[test]
fn test_fifty_lakh_receipts_hit_top_slab() {
    let r = engine_on(2024, 5, 1).calculate_tax(dec!(5_000_000), false);

    // 24,50,000 taxable: 1,40,000 through 15L + 30% of 9,50,000 = 4,25,000
    assert_eq!(r.section_44ada_tax, dec!(442000));
    // 44,50,000 taxable: 1,40,000 + 30% of 29,50,000 = 10,25,000
    assert_eq!(r.regular_tax, dec!(1066000));
    assert_eq!(r.savings, dec!(624000));
}

#[test]
fn test_regular_scheme_can_win_under_custom_ratio() {
    let config = TaxRegimeConfig {
        presumptive_ratio: dec!(1),
        ..TaxRegimeConfig::default()
    };
    let engine = TaxEngine::with_clock(config, FixedClock(date(2024, 5, 1))).unwrap();

    let r = engine.calculate_tax(dec!(2_000_000), false);
    assert_eq!(r.section_44ada_tax, dec!(286000));
    assert_eq!(r.regular_tax, dec!(223600));
    assert_eq!(r.recommended_scheme, TaxScheme::Regular);
    assert_eq!(r.final_tax, dec!(223600));
    assert_eq!(r.savings, dec!(62400));

    // Health insurance takes a further 25,000 off the regular figure
    let insured = engine.calculate_tax(dec!(2_000_000), true);
    assert_eq!(insured.regular_taxable_income, dec!(1_725_000));
    assert_eq!(insured.regular_tax, dec!(215800));
    assert_eq!(insured.section_44ada_tax, r.section_44ada_tax);
}

#[test]
fn test_final_tax_is_minimum_and_savings_absolute() {
    let engine = engine_on(2024, 8, 1);
    for income in [
        dec!(0),
        dec!(1),
        dec!(99_999),
        dec!(600_000),
        dec!(1_400_000),
        dec!(2_750_000),
        dec!(12_345_678.90),
    ] {
        for health in [false, true] {
            let r = engine.calculate_tax(income, health);
            assert_eq!(r.final_tax, r.section_44ada_tax.min(r.regular_tax));
            assert_eq!(r.savings, (r.section_44ada_tax - r.regular_tax).abs());
            assert!(r.section_44ada_taxable_income >= Decimal::ZERO);
            assert!(r.regular_taxable_income >= Decimal::ZERO);
            assert_eq!(r.advance_tax_schedule[3].amount, r.final_tax);
        }
    }
}

#[test]
fn test_health_insurance_never_raises_regular_tax() {
    let engine = engine_on(2024, 8, 1);
    for income in [dec!(500_000), dec!(900_000), dec!(3_000_000)] {
        let without = engine.calculate_tax(income, false);
        let with = engine.calculate_tax(income, true);
        assert!(with.regular_tax <= without.regular_tax);
    }
}

// ===========================================================================
// Slabs
// ===========================================================================

#[test]
fn test_progressive_tax_is_monotonic() {
    let config = TaxRegimeConfig::default();
    let mut previous = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    while income <= dec!(3_000_000) {
        let tax = progressive_tax(income, &config);
        assert!(tax >= previous, "tax fell at {income}");
        previous = tax;
        income += dec!(25_000);
    }
}

#[test]
fn test_slab_boundaries() {
    let config = TaxRegimeConfig::default();
    assert_eq!(progressive_tax(dec!(300_000), &config), Decimal::ZERO);
    assert_eq!(progressive_tax(dec!(700_000), &config), dec!(20800));
    assert_eq!(progressive_tax(dec!(1_000_000), &config), dec!(52000));
    assert_eq!(progressive_tax(dec!(1_200_000), &config), dec!(83200));
    assert_eq!(progressive_tax(dec!(1_500_000), &config), dec!(145600));
}

#[test]
fn test_custom_slab_table_from_json() {
    let config = TaxRegimeConfig::from_json(
        r#"{
            "financial_year": "2025-26",
            "slabs": [
                { "lower_bound": "0", "upper_bound": "400000", "rate": "0" },
                { "lower_bound": "400000", "upper_bound": null, "rate": "10" }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(config.financial_year, "2025-26");
    assert_eq!(config.standard_deduction, dec!(50000));
    // 1,00,000 at 10% = 10,000 + 4% cess
    assert_eq!(progressive_tax(dec!(500_000), &config), dec!(10400));
}

#[test]
fn test_gapped_slabs_are_rejected() {
    let mut slabs = default_slabs();
    slabs[2] = TaxSlab::new(dec!(750_000), Some(dec!(1_000_000)), dec!(10));
    let config = TaxRegimeConfig {
        slabs,
        ..TaxRegimeConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(FreelanceTaxError::InvalidConfig(_))
    ));
}

// ===========================================================================
// Envelopes
// ===========================================================================

#[test]
fn test_compare_envelope() {
    let input = TaxComparisonInput {
        total_income: dec!(1_000_000),
        has_health_insurance: false,
        as_of: Some(date(2024, 5, 1)),
        config: None,
    };
    let out = regime::compare_tax_schemes(&input).unwrap();
    assert_eq!(out.result.final_tax, dec!(7800));
    assert!(out.methodology.contains("44ADA"));
    assert_eq!(out.assumptions["financial_year"], "2024-25");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_compare_envelope_rejects_negative_income() {
    let input = TaxComparisonInput {
        total_income: dec!(-1),
        has_health_insurance: false,
        as_of: None,
        config: None,
    };
    match regime::compare_tax_schemes(&input) {
        Err(FreelanceTaxError::InvalidInput { field, .. }) => assert_eq!(field, "total_income"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_envelopes_reject_amounts_beyond_ceiling() {
    let input: TaxComparisonInput =
        serde_json::from_str(r#"{ "total_income": "10000000000000000000000000000" }"#).unwrap();
    assert!(matches!(
        regime::compare_tax_schemes(&input),
        Err(FreelanceTaxError::InvalidInput { .. })
    ));

    let gst = GstInput {
        amount: dec!(10000000000000000000000000000),
        gst_rate: dec!(18),
        supply_type: SupplyType::IntraState,
    };
    assert!(matches!(
        calculator::compute_gst(&gst),
        Err(FreelanceTaxError::InvalidInput { .. })
    ));

    let just_over = TaxComparisonInput {
        total_income: MAX_AMOUNT + dec!(0.01),
        has_health_insurance: false,
        as_of: Some(date(2024, 5, 1)),
        config: None,
    };
    assert!(regime::compare_tax_schemes(&just_over).is_err());
}

#[test]
fn test_compare_envelope_accepts_json_numbers_and_strings() {
    let input: TaxComparisonInput = serde_json::from_str(
        r#"{ "total_income": 1000000, "as_of": "2024-05-01" }"#,
    )
    .unwrap();
    assert_eq!(input.total_income, dec!(1_000_000));

    let input: TaxComparisonInput =
        serde_json::from_str(r#"{ "total_income": "1000000.50" }"#).unwrap();
    assert_eq!(input.total_income, dec!(1_000_000.50));
}

#[test]
fn test_advance_tax_envelope_totals() {
    let input = AdvanceTaxInput {
        annual_tax: dec!(36400),
        as_of: Some(date(2024, 12, 20)),
    };
    let out = advance_tax::build_advance_tax_schedule(&input).unwrap();
    // Three deadlines passed: 27,300 cumulative
    assert_eq!(out.result.overdue_amount, dec!(27300));
    assert_eq!(out.result.next_due, Some(date(2025, 3, 15)));
    let installments: Money = out.result.payments.iter().map(|p| p.installment_amount).sum();
    assert_eq!(installments, dec!(36400));
}

#[test]
fn test_gst_envelope() {
    let intra = calculator::compute_gst(&GstInput {
        amount: dec!(25000),
        gst_rate: dec!(18),
        supply_type: SupplyType::IntraState,
    })
    .unwrap();
    assert_eq!(intra.result.total_gst, dec!(4500));
    assert_eq!(intra.result.cgst, dec!(2250));
    assert_eq!(intra.result.sgst, dec!(2250));
    assert_eq!(intra.result.invoice_total, dec!(29500));
    assert!(intra.warnings.is_empty());

    let inter = calculator::compute_gst(&GstInput {
        amount: dec!(25000),
        gst_rate: dec!(15),
        supply_type: SupplyType::InterState,
    })
    .unwrap();
    assert_eq!(inter.result.igst, dec!(3750));
    assert_eq!(inter.result.cgst, Decimal::ZERO);
    assert_eq!(inter.warnings.len(), 1);
}

// ===========================================================================
// Financial year and quarter
// ===========================================================================

#[test]
fn test_financial_year_and_quarter() {
    assert_eq!(current_financial_year(date(2024, 4, 1)), "2024-25");
    assert_eq!(current_financial_year(date(2025, 3, 31)), "2024-25");
    assert_eq!(quarter_from_date(date(2024, 4, 1)), 1);
    assert_eq!(quarter_from_date(date(2024, 9, 30)), 2);
    assert_eq!(quarter_from_date(date(2024, 10, 1)), 3);
    assert_eq!(quarter_from_date(date(2025, 3, 31)), 4);

    let engine = engine_on(2026, 1, 15);
    assert_eq!(engine.current_financial_year(), "2025-26");
}
