use magnetvars_core::interpolate::{InterpolationOptions, VariableInterpolator, interpolate_variables};
use magnetvars_core::vars::{VarValue, VariableMap, merge_layers};
use rstest::rstest;

fn vars(json: &str) -> VariableMap {
    serde_json::from_str(json).unwrap()
}

fn render(template: &str, vars: &VariableMap) -> (String, Vec<String>) {
    let out = interpolate_variables(template, vars, &InterpolationOptions::default()).unwrap();
    (out.content, out.unresolved_variables)
}

#[rstest]
#[case("")]
#[case("Plain text with {braces} and | pipes.")]
#[case("{if} not a block {/if}")]
#[case("Multi\nline\n\ttext")]
fn templates_without_tokens_are_unchanged(#[case] template: &str) {
    let (content, unresolved) = render(template, &vars(r#"{"name": "Ann"}"#));
    assert_eq!(content, template);
    assert!(unresolved.is_empty());
}

#[test]
fn resolved_tokens_leave_nothing_behind() {
    let vars = vars(r#"{"name": "Ann", "company": "Acme", "user": {"plan": "pro"}}"#);
    let (content, unresolved) = render("@name from @company on @user.plan | uppercase", &vars);
    assert_eq!(content, "Ann from Acme on PRO");
    assert!(!content.contains('@'));
    assert!(unresolved.is_empty());
}

#[test]
fn missing_token_gets_placeholder_and_is_reported() {
    let opts = InterpolationOptions::default().with_placeholder("[missing]");
    let out = interpolate_variables("Hi @ghost", &VariableMap::new(), &opts).unwrap();
    assert_eq!(out.content, "Hi [missing]");
    assert_eq!(out.unresolved_variables, vec!["ghost"]);
}

#[test]
fn interpolation_is_idempotent_on_its_output() {
    let vars = vars(r#"{"name": "Ann", "score": 91}"#);
    let (first, _) = render("{if @score > 80}Top marks, @name!{/if} Score: @score", &vars);
    let (second, unresolved) = render(&first, &vars);
    assert_eq!(first, "Top marks, Ann! Score: 91");
    assert_eq!(second, first);
    assert!(unresolved.is_empty());
}

#[test]
fn formatter_example() {
    let vars = vars(r#"{"name": "Ann", "score": "pass"}"#);
    let (content, unresolved) = render("Hello @name, you scored @score|uppercase", &vars);
    assert_eq!(content, "Hello Ann, you scored PASS");
    assert!(unresolved.is_empty());
}

#[rstest]
#[case(90, "Great job! Thanks Lee")]
#[case(50, " Thanks Lee")]
fn conditional_example(#[case] score: i64, #[case] expected: &str) {
    let mut vars = VariableMap::new();
    vars.insert("score".into(), VarValue::from(score));
    vars.insert("name".into(), VarValue::from("Lee"));
    let (content, unresolved) = render("{if @score > 80}Great job!{/if} Thanks @name", &vars);
    assert_eq!(content, expected);
    assert!(unresolved.is_empty());
}

#[test]
fn layers_feed_one_render() {
    let answers = vars(r#"{"name": "ann", "score": 40}"#);
    let ai = vars(r#"{"summary": "Solid start", "score": 85}"#);
    let merged = merge_layers([&answers, &ai]);

    let interpolator = VariableInterpolator::new(InterpolationOptions::default()).unwrap();
    let out = interpolator.interpolate(
        "@name | capitalize: {if @score >= 80}@summary{else}Keep going{/if}",
        &merged,
    );
    assert_eq!(out.content, "Ann: Solid start");
    assert!(out.is_complete());
}
