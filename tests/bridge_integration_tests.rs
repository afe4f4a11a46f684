//! Tests against a real Python worker. Run with `--ignored` where a python3
//! interpreter is available.

use pytuga::bridge::bridge_error::BridgeError;
use pytuga::bridge::protocol::HostValue;
use pytuga::{
    compile, eval, exec, is_incomplete_source, CompileMode, ExecOptions, Namespace,
    PythonBridge, SourceOrCode, TranspileError,
};

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_eval_inclusive_range() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let value = eval(
        &mut bridge,
        SourceOrCode::Source("soma([x para x de 1 até 10])"),
        &ExecOptions::default(),
    )
    .expect("Eval failed");
    assert_eq!(value.as_i64(), Some(55));
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_exec_keeps_globals() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let globals = Namespace::new();
    let options = ExecOptions {
        globals: Some(&globals),
        ..ExecOptions::default()
    };
    exec(
        &mut bridge,
        SourceOrCode::Source("total = 0\nrepita 4 vezes:\n    total = total + raiz(9)\n"),
        &options,
    )
    .expect("Exec failed");
    let value = eval(&mut bridge, SourceOrCode::Source("total"), &options).expect("Eval failed");
    assert_eq!(value.as_f64(), Some(12.0));
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_compiled_code() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let code = compile(&mut bridge, "verdadeiro e não falso", "<input>", CompileMode::Eval, 0, false)
        .expect("Compile failed");
    let value = eval(&mut bridge, SourceOrCode::Code(&code), &ExecOptions::default())
        .expect("Eval failed");
    assert_eq!(value, HostValue::from(true));
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_error_line_is_source_line() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let err = exec(
        &mut bridge,
        SourceOrCode::Source("x = 1\nse x é 1 então:\n    mostre(y)\n"),
        &ExecOptions::default(),
    )
    .unwrap_err();
    match err {
        TranspileError::Host(BridgeError::PythonException { py_type, lineno, .. }) => {
            assert_eq!(py_type, "NameError");
            assert_eq!(lineno, Some(3));
        }
        other => panic!("Expected Python exception, got {:?}", other),
    }
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_builtins_are_restored() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let options = ExecOptions {
        expose_runtime: false,
        install_builtins: true,
        ..ExecOptions::default()
    };
    let value = eval(&mut bridge, SourceOrCode::Source("tamanho('abc')"), &options)
        .expect("Eval with builtins failed");
    assert_eq!(value.as_i64(), Some(3));

    let plain = ExecOptions {
        expose_runtime: false,
        ..ExecOptions::default()
    };
    let err = eval(&mut bridge, SourceOrCode::Source("tamanho('abc')"), &plain).unwrap_err();
    assert!(format!("{err}").contains("NameError"));
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_is_incomplete() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    assert!(is_incomplete_source(&mut bridge, "enquanto x faça:", "<input>", "single").unwrap());
    assert!(!is_incomplete_source(&mut bridge, "x = 1", "<input>", "single").unwrap());
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_big_integer_keeps_precision() {
    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let value = eval(&mut bridge, SourceOrCode::Source("2 ** 70 + 1"), &ExecOptions::default())
        .expect("Eval failed");
    assert_eq!(value.to_string(), "1180591620717411303425");
    assert_eq!(value.as_i64(), None);
}

#[test]
#[ignore = "requires a python3 interpreter"]
fn test_bridge_discarded_code_is_stale() {
    use pytuga::Host;

    let mut bridge = PythonBridge::new().expect("Failed to start bridge");
    let code = compile(&mut bridge, "1 + 1", "<input>", CompileMode::Eval, 0, false)
        .expect("Compile failed");
    bridge.discard(&code.id).expect("Discard failed");
    let err = eval(&mut bridge, SourceOrCode::Code(&code), &ExecOptions::default()).unwrap_err();
    assert!(matches!(err, TranspileError::Host(BridgeError::StaleHandle(_))), "{err:?}");
}
