use anyhow::Result;
use numex_compute::{Evaluator, RowEval};
use numex_datatype::{PreciseType, Temporal, Value};
use numex_expr::{
    resolve, CastType, DiagCode, Diagnostic, DiagnosticArea, Expr, PreparedExpr, Session, Severity,
    SqlMode,
};
use rand::Rng;

fn eval_in(mut e: Expr, session: &Session) -> Result<(Value, Vec<Diagnostic>)> {
    resolve(&mut e, session)?;
    let mut diags: Vec<Diagnostic> = vec![];
    let v = Evaluator::new(session, &mut diags).eval(&e, &[])?;
    Ok((v, diags))
}

fn eval(e: Expr) -> Result<(Value, Vec<Diagnostic>)> {
    eval_in(e, &Session::default())
}

fn i(v: i64) -> Expr {
    Expr::const_i64(v)
}

fn u(v: u64) -> Expr {
    Expr::const_u64(v)
}

fn d(s: &str) -> Expr {
    Expr::const_decimal(s.parse().unwrap())
}

fn f(v: f64) -> Expr {
    Expr::const_f64(v)
}

#[test]
fn test_integer_overflow() -> Result<()> {
    let (res, diags) = eval(Expr::add(i(i64::MAX), i(1)))?;
    assert_eq!(Value::Null, res);
    assert_eq!(1, diags.len());
    assert_eq!(Severity::Warning, diags[0].severity);
    assert_eq!(1690, diags[0].code.code());

    let (res, diags) = eval(Expr::mul(i(1 << 32), i(1 << 32)))?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::DataOutOfRange, diags[0].code);

    let (res, diags) = eval(Expr::int_div(i(i64::MIN), i(-1)))?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::DataOutOfRange, diags[0].code);

    let (res, _) = eval(Expr::add(u(u64::MAX - 1), i(1)))?;
    assert_eq!(Value::U64(u64::MAX), res);
    let (res, diags) = eval(Expr::sub(i(-1), u(1)))?;
    assert_eq!(Value::Null, res);
    assert!(diags[0].message.starts_with("BIGINT UNSIGNED value is out of range"));
    Ok(())
}

#[test]
fn test_unsigned_subtraction_mode() -> Result<()> {
    let e = Expr::sub(
        Expr::cast(i(1), CastType::Unsigned),
        Expr::cast(i(2), CastType::Unsigned),
    );
    let (res, diags) = eval(e.clone())?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::DataOutOfRange, diags[0].code);

    let session = Session::default()
        .with_sql_mode(SqlMode::NO_UNSIGNED_SUBTRACTION | SqlMode::ERROR_FOR_DIVISION_BY_ZERO);
    let (res, diags) = eval_in(e, &session)?;
    assert_eq!(Value::I64(-1), res);
    assert!(diags.is_empty());
    Ok(())
}

#[test]
fn test_division_by_zero() -> Result<()> {
    for e in [
        Expr::div(i(5), i(0)),
        Expr::modulo(i(5), i(0)),
        Expr::int_div(i(5), i(0)),
        Expr::div(d("5.0"), d("0.00")),
    ] {
        let (res, diags) = eval(e)?;
        assert_eq!(Value::Null, res);
        assert_eq!(1365, diags[0].code.code());
        assert_eq!("Division by 0", diags[0].message);
    }
    let (res, diags) = eval(Expr::div(f(5.0), f(0.0)))?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::DivisionByZero, diags[0].code);

    let lenient = Session::default().with_sql_mode(SqlMode::empty());
    let (res, diags) = eval_in(Expr::div(i(5), i(0)), &lenient)?;
    assert_eq!(Value::Null, res);
    assert!(diags.is_empty());
    Ok(())
}

#[test]
fn test_decimal_division() -> Result<()> {
    let (res, diags) = eval(Expr::div(d("5.05"), d("0.014")))?;
    assert_eq!("360.714286", res.to_string());
    assert!(diags.is_empty());
    let (res, _) = eval(Expr::div(i(1), i(3)))?;
    assert_eq!("0.3333", res.to_string());
    let session = Session::default().with_div_precision_increment(9);
    let (res, _) = eval_in(Expr::div(i(2), i(3)), &session)?;
    assert_eq!("0.666666667", res.to_string());
    Ok(())
}

#[test]
fn test_int_div_and_mod() -> Result<()> {
    let (res, _) = eval(Expr::int_div(i(-7), i(2)))?;
    assert_eq!(Value::I64(-3), res);
    let (res, _) = eval(Expr::int_div(d("7.9"), d("-2")))?;
    assert_eq!(Value::I64(-3), res);
    let (res, _) = eval(Expr::modulo(i(-7), i(2)))?;
    assert_eq!(Value::I64(-1), res);
    let (res, _) = eval(Expr::modulo(i(7), i(-2)))?;
    assert_eq!(Value::I64(1), res);
    let (res, _) = eval(Expr::modulo(d("5.5"), i(2)))?;
    assert_eq!("1.5", res.to_string());
    let (res, _) = eval(Expr::modulo(f(-5.5), f(2.0)))?;
    assert_eq!(Value::new_f64(-1.5).unwrap(), res);
    Ok(())
}

#[test]
fn test_rounding() -> Result<()> {
    let (res, _) = eval(Expr::round(
        Expr::cast(d("2.5"), CastType::Decimal(2, 1)),
        None,
    ))?;
    assert_eq!("3", res.to_string());
    let (res, diags) = eval(Expr::round(
        Expr::cast(d("2.5"), CastType::Decimal(2, 0)),
        None,
    ))?;
    assert_eq!("3", res.to_string());
    assert!(diags.is_empty());
    let (res, _) = eval(Expr::round(
        Expr::cast(d("-2.5"), CastType::Decimal(2, 0)),
        None,
    ))?;
    assert_eq!("-3", res.to_string());
    let (res, _) = eval(Expr::round(f(2.5), None))?;
    assert_eq!(Value::new_f64(2.0).unwrap(), res);
    let (res, _) = eval(Expr::round(d("-2.5"), None))?;
    assert_eq!("-3", res.to_string());
    let (res, _) = eval(Expr::round(i(15), Some(i(-1))))?;
    assert_eq!(Value::I64(20), res);
    let (res, _) = eval(Expr::round(i(-15), Some(i(-1))))?;
    assert_eq!(Value::I64(-20), res);
    let (res, _) = eval(Expr::truncate(d("1.999"), i(2)))?;
    assert_eq!("1.99", res.to_string());
    let (res, _) = eval(Expr::truncate(i(1999), i(-2)))?;
    assert_eq!(Value::I64(1900), res);
    let (res, _) = eval(Expr::round(d("1.298"), Some(i(1))))?;
    assert_eq!("1.3", res.to_string());
    let (res, _) = eval(Expr::round(i(i64::MAX), Some(i(-19))))?;
    assert_eq!(Value::Null, res);
    Ok(())
}

#[test]
fn test_rounding_with_column_digits() -> Result<()> {
    let mut e = Expr::round(
        d("123.456"),
        Some(Expr::col(0, "n", PreciseType::i64(), true)),
    );
    let session = Session::default();
    resolve(&mut e, &session)?;
    let mut diags: Vec<Diagnostic> = vec![];
    let mut ev = Evaluator::new(&session, &mut diags);
    assert_eq!("123.46", ev.eval(&e, &[Value::I64(2)])?.to_string());
    assert_eq!("100", ev.eval(&e, &[Value::I64(-2)])?.to_string());
    assert_eq!(Value::Null, ev.eval(&e, &[Value::Null])?);
    Ok(())
}

#[test]
fn test_ceiling_floor() -> Result<()> {
    let (res, _) = eval(Expr::ceiling(d("1.2")))?;
    assert_eq!(Value::I64(2), res);
    let (res, _) = eval(Expr::ceiling(d("-1.2")))?;
    assert_eq!(Value::I64(-1), res);
    let (res, _) = eval(Expr::floor(d("-1.2")))?;
    assert_eq!(Value::I64(-2), res);
    let (res, _) = eval(Expr::floor(i(7)))?;
    assert_eq!(Value::I64(7), res);
    let (res, _) = eval(Expr::ceiling(f(1.5)))?;
    assert_eq!(Value::new_f64(2.0).unwrap(), res);
    Ok(())
}

#[test]
fn test_neg_abs() -> Result<()> {
    let (res, _) = eval(Expr::neg(i(5)))?;
    assert_eq!(Value::I64(-5), res);
    let (res, _) = eval(Expr::neg(u(9223372036854775808)))?;
    assert_eq!(Value::I64(i64::MIN), res);
    let (res, _) = eval(Expr::abs(i(-5)))?;
    assert_eq!(Value::I64(5), res);
    let (res, _) = eval(Expr::abs(d("-1.50")))?;
    assert_eq!("1.50", res.to_string());
    let mut e = Expr::neg(Expr::col(0, "a", PreciseType::i64(), false));
    let session = Session::default();
    resolve(&mut e, &session)?;
    let mut diags: Vec<Diagnostic> = vec![];
    let res = Evaluator::new(&session, &mut diags).eval(&e, &[Value::I64(i64::MIN)])?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::DataOutOfRange, diags[0].code);
    Ok(())
}

#[test]
fn test_math_domain() -> Result<()> {
    for e in [
        Expr::func(numex_expr::FuncKind::Sqrt, vec![i(-1)]),
        Expr::func(numex_expr::FuncKind::Ln, vec![i(0)]),
        Expr::func(numex_expr::FuncKind::Acos, vec![i(2)]),
    ] {
        let (res, diags) = eval(e)?;
        assert_eq!(Value::Null, res);
        assert_eq!(1, diags.len());
    }
    let (res, _) = eval(Expr::func(numex_expr::FuncKind::Sqrt, vec![i(16)]))?;
    assert_eq!(Value::new_f64(4.0).unwrap(), res);
    Ok(())
}

#[test]
fn test_least_greatest() -> Result<()> {
    let (res, _) = eval(Expr::least(vec![i(1), i(2), Expr::const_null()]))?;
    assert_eq!(Value::Null, res);
    let (res, _) = eval(Expr::greatest(vec![Expr::const_str("10"), Expr::const_str("9")]))?;
    assert_eq!(Value::str("9"), res);
    let (res, _) = eval(Expr::greatest(vec![i(10), i(9)]))?;
    assert_eq!(Value::I64(10), res);
    let (res, _) = eval(Expr::least(vec![i(3), d("2.5"), i(4)]))?;
    assert_eq!("2.5", res.to_string());
    let (res, _) = eval(Expr::least(vec![i(-1), u(1)]))?;
    assert_eq!("-1", res.to_string());
    let (res, _) = eval(Expr::least(vec![
        Expr::const_temporal(Temporal::parse("2021-03-01").unwrap()),
        Expr::const_temporal(Temporal::parse("2020-12-31").unwrap()),
    ]))?;
    assert_eq!("2020-12-31", res.to_string());
    Ok(())
}

#[test]
fn test_integer_edges() -> Result<()> {
    let (res, _) = eval(Expr::modulo(i(i64::MIN), i(-1)))?;
    assert_eq!(Value::I64(0), res);
    let (res, _) = eval(Expr::mul(i(i64::MIN), i(1)))?;
    assert_eq!(Value::I64(i64::MIN), res);
    let (res, diags) = eval(Expr::mul(u(1 << 63), u(2)))?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::DataOutOfRange, diags[0].code);
    let (res, _) = eval(Expr::mul(i(-3), i(4)))?;
    assert_eq!(Value::I64(-12), res);
    Ok(())
}

#[test]
fn test_temporal_arith_with_integral_decimal() -> Result<()> {
    let date = || Expr::const_temporal(Temporal::parse("2021-03-01").unwrap());
    let (res, diags) = eval(Expr::add(date(), d("1")))?;
    assert_eq!(Value::I64(20210302), res);
    assert!(diags.is_empty());
    let (res, _) = eval(Expr::sub(date(), i(1)))?;
    assert_eq!(Value::I64(20210300), res);
    let (res, _) = eval(Expr::add(date(), d("0.5")))?;
    assert_eq!("20210301.5", res.to_string());
    Ok(())
}

#[test]
fn test_least_temporal_with_string() -> Result<()> {
    let (res, diags) = eval(Expr::least(vec![
        Expr::const_temporal(Temporal::parse("2011-11-21").unwrap()),
        Expr::const_str("2010-10-09"),
    ]))?;
    assert!(res.to_string().starts_with("2010-10-09"));
    assert!(diags.is_empty());
    let (res, diags) = eval(Expr::least(vec![
        Expr::const_temporal(Temporal::parse("2011-11-21").unwrap()),
        Expr::const_str("not a date"),
    ]))?;
    assert_eq!(Value::Null, res);
    assert_eq!(DiagCode::TruncatedWrongValue, diags[0].code);
    Ok(())
}

#[test]
fn test_field() -> Result<()> {
    let (res, _) = eval(Expr::field(
        Expr::const_str("b"),
        vec![Expr::const_str("a"), Expr::const_str("b")],
    ))?;
    assert_eq!(Value::I64(2), res);
    let (res, _) = eval(Expr::field(Expr::const_null(), vec![i(1), Expr::const_null()]))?;
    assert_eq!(Value::I64(0), res);
    let (res, _) = eval(Expr::field(i(2), vec![i(1), d("2.0")]))?;
    assert_eq!(Value::I64(2), res);
    let (res, _) = eval(Expr::field(i(3), vec![i(1), i(2)]))?;
    assert_eq!(Value::I64(0), res);
    Ok(())
}

#[test]
fn test_find_in_set() -> Result<()> {
    let fis = |a: &str, b: &str| eval(Expr::find_in_set(Expr::const_str(a), Expr::const_str(b)));
    assert_eq!(Value::I64(2), fis("b", "a,b,c")?.0);
    assert_eq!(Value::I64(0), fis("d", "a,b,c")?.0);
    assert_eq!(Value::I64(0), fis("a", "")?.0);
    assert_eq!(Value::I64(0), fis("abc", "a")?.0);
    let (res, _) = eval(Expr::find_in_set(Expr::const_null(), Expr::const_str("a")))?;
    assert_eq!(Value::Null, res);
    Ok(())
}

#[test]
fn test_string_operands() -> Result<()> {
    let (res, diags) = eval(Expr::mul(Expr::const_str("3"), i(2)))?;
    assert_eq!(Value::new_f64(6.0).unwrap(), res);
    assert!(diags.is_empty());
    let (res, diags) = eval(Expr::add(Expr::const_str("abc"), i(1)))?;
    assert_eq!(Value::new_f64(1.0).unwrap(), res);
    assert_eq!(DiagCode::TruncatedWrongValue, diags[0].code);
    Ok(())
}

#[test]
fn test_prepared_keeps_type() -> Result<()> {
    let prepared = PreparedExpr::prepare(Expr::div(i(1), i(3)), &Session::default())?;
    let session = Session::default().with_div_precision_increment(10);
    let mut diags: Vec<Diagnostic> = vec![];
    let res = prepared.row_eval(&session, &[], &mut diags)?;
    assert_eq!("0.3333", res.to_string());

    let prepared = PreparedExpr::prepare(Expr::div(i(1), i(0)), &Session::default())?;
    let lenient = Session::default().with_sql_mode(SqlMode::empty());
    let res = prepared.row_eval(&lenient, &[], &mut diags)?;
    assert_eq!(Value::Null, res);
    assert!(diags.is_empty());
    Ok(())
}

#[test]
fn test_diagnostic_area_bounded() -> Result<()> {
    let session = Session::default();
    let mut e = Expr::add(Expr::col(0, "a", PreciseType::i64(), false), i(i64::MAX));
    resolve(&mut e, &session)?;
    let mut area = DiagnosticArea::with_capacity(2);
    let mut ev = Evaluator::new(&session, &mut area);
    for _ in 0..5 {
        assert_eq!(Value::Null, ev.eval(&e, &[Value::I64(1)])?);
    }
    assert_eq!(2, area.diagnostics().len());
    assert_eq!(5, area.total());
    Ok(())
}

#[test]
fn test_random_int_arith() -> Result<()> {
    let mut rng = rand::thread_rng();
    let session = Session::default();
    for _ in 0..1000 {
        let (a, b): (i64, i64) = if rng.gen_bool(0.5) {
            (rng.gen(), rng.gen())
        } else {
            (rng.gen_range(-100_000..100_000), rng.gen_range(-100_000..100_000))
        };
        let cases = [
            (Expr::add(i(a), i(b)), a as i128 + b as i128),
            (Expr::sub(i(a), i(b)), a as i128 - b as i128),
            (Expr::mul(i(a), i(b)), a as i128 * b as i128),
        ];
        for (e, expected) in cases {
            let (res, diags) = eval_in(e, &session)?;
            match i64::try_from(expected) {
                Ok(v) => {
                    assert_eq!(Value::I64(v), res);
                    assert!(diags.is_empty());
                }
                Err(_) => {
                    assert_eq!(Value::Null, res);
                    assert_eq!(DiagCode::DataOutOfRange, diags[0].code);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_random_round_idempotent() -> Result<()> {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let n: i64 = rng.gen_range(-1_000_000_000..1_000_000_000);
        let (sign, m) = if n < 0 { ("-", n.unsigned_abs()) } else { ("", n as u64) };
        let text = format!("{}{}.{:04}", sign, m / 10_000, m % 10_000);
        let digits = rng.gen_range(-3..4);
        let (once, _) = eval(Expr::round(d(&text), Some(i(digits))))?;
        let Value::Decimal(once) = once else {
            panic!("round of decimal must be decimal");
        };
        let (twice, _) = eval(Expr::round(Expr::const_decimal(once.clone()), Some(i(digits))))?;
        assert_eq!(Value::Decimal(once), twice);
    }
    Ok(())
}

#[test]
fn test_random_real_round_idempotent() -> Result<()> {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let x: f64 = rng.gen_range(-1_000_000.0..1_000_000.0);
        let digits = rng.gen_range(-4..7);
        let (once, _) = eval(Expr::round(f(x), Some(i(digits))))?;
        let Value::F64(once) = once else {
            panic!("round of double must be double");
        };
        let (twice, _) = eval(Expr::round(f(once.value()), Some(i(digits))))?;
        assert_eq!(Value::F64(once), twice, "round({}, {})", x, digits);
    }
    Ok(())
}
