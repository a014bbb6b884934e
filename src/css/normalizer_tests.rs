use tempfile::tempdir;

use crate::config::NormalizerConfig;
use crate::css::normalizer::Normalizer;
use crate::test_utils::{parse_css, write_fixture};

const LAYERED_THEME: &str = r#"@layer base {
  :root {
    --brand: #0055ff;
    --gap: 8px;
  }
}
@layer components {
  .card {
    color: var(--brand);
    padding: var(--gap) calc(var(--gap) * 2);
    border: var(--border-width, 1px) solid var(--brand);
  }
}
"#;

#[test]
fn test_normalize_layered_theme() {
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();

    let output = normalizer.normalize_str(LAYERED_THEME).unwrap();

    let expected = r#":root {
  --brand: #0055ff;
  --gap: 8px;
}
.card {
  color: #0055ff;
  padding: 8px calc(8px * 2);
  border: 1px solid #0055ff;
}
"#;
    assert_eq!(output, expected);
}

#[test]
fn test_output_reparses_and_is_stable() {
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();

    let first = normalizer.normalize_str(LAYERED_THEME).unwrap();
    let second = normalizer.normalize_str(&first).unwrap();

    assert_eq!(first, second);
    assert_eq!(parse_css(&second).count_at_rules("layer"), 0);
}

#[test]
fn test_only_configured_plugins_run() {
    let config = NormalizerConfig {
        plugins: vec!["remove-layers".to_string()],
        ..NormalizerConfig::default()
    };
    let normalizer = Normalizer::new(config).unwrap();

    let output = normalizer.normalize_str(LAYERED_THEME).unwrap();

    assert!(!output.contains("@layer"));
    assert!(output.contains("color: var(--brand);"));
}

#[test]
fn test_normalize_file_with_imports_and_layers() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), "tokens.css", "@layer tokens {\n  :root { --ink: #111; }\n}\n");
    let main = write_fixture(
        dir.path(),
        "main.css",
        "@import \"tokens.css\";\n@layer base {\n  body { color: var(--ink); }\n}\n",
    );
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();

    let output = normalizer.normalize_file(&main).unwrap();

    assert_eq!(output, ":root {\n  --ink: #111;\n}\nbody {\n  color: #111;\n}\n");
}

#[test]
fn test_pretty_output_uses_formatter() {
    let config = NormalizerConfig {
        pretty: true,
        ..NormalizerConfig::default()
    };
    let normalizer = Normalizer::new(config).unwrap();

    let output = normalizer.normalize_str("@layer a { .x { width: var(--w, 2px); } }").unwrap();

    assert!(output.contains(".x"));
    assert!(output.contains("width: 2px"));
    assert!(!output.contains("var("));
}

#[test]
fn test_unknown_plugin_fails_construction() {
    let config = NormalizerConfig {
        plugins: vec!["inline-svg".to_string()],
        ..NormalizerConfig::default()
    };
    assert!(Normalizer::new(config).is_err());
}

#[test]
fn test_missing_variable_output_normalizes_again() {
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();

    let first = normalizer.normalize_str(".a { color: var(--nope); }").unwrap();
    let second = normalizer.normalize_str(&first).unwrap();

    assert_eq!(first, ".a {\n  color:;\n}\n");
    assert_eq!(first, second);
}

const TAILWIND_FRAGMENT: &str = r#"@layer theme, base, utilities;
@layer base {
  *, ::before, ::after {
    --tw-pan-x:  ;
    --tw-ring-inset: ;
    --tw-ring-color: rgb(59 130 246 / 0.5);
  }
}
@layer utilities {
  .ring {
    box-shadow: var(--tw-ring-inset) 0 0 0 3px var(--tw-ring-color);
  }
  .touch-pan-x {
    touch-action: var(--tw-pan-x) pan-y;
  }
  @media (width >= 40rem) {
    .sm\:flex {
      display: flex;
    }
  }
}
"#;

#[test]
fn test_tailwind_fragment_keeps_content_and_reparses() {
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();

    let first = normalizer.normalize_str(TAILWIND_FRAGMENT).unwrap();

    let expected = r#"*, ::before, ::after {
  --tw-pan-x:;
  --tw-ring-inset:;
  --tw-ring-color: rgb(59 130 246 / 0.5);
}
.ring {
  box-shadow: 0 0 0 3px rgb(59 130 246 / 0.5);
}
.touch-pan-x {
  touch-action: pan-y;
}
@media (width >= 40rem) {
  .sm\:flex {
    display: flex;
  }
}
"#;
    assert_eq!(first, expected);

    let second = normalizer.normalize_str(&first).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_normalize_file_with_layered_import() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), "base.css", ":root { --ink: #111; }");
    let main = write_fixture(
        dir.path(),
        "main.css",
        "@import \"base.css\" layer(base);\nbody { color: var(--ink); }\n",
    );
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();

    let output = normalizer.normalize_file(&main).unwrap();

    assert_eq!(output, ":root {\n  --ink: #111;\n}\nbody {\n  color: #111;\n}\n");
}
