//! JNI entry points for `com.mathoku.core.MathokuCore`.
//!
//! Failures are thrown into the JVM as `RuntimeException` and the function
//! returns null; the Kotlin side sees an ordinary exception.

use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::api::simple::greet;
use crate::api::user::get_dummy_user_json;
use crate::error::panic_message;

const EXCEPTION_CLASS: &str = "java/lang/RuntimeException";

fn respond<F>(env: &mut JNIEnv, body: F) -> jstring
where
    F: FnOnce(&mut JNIEnv) -> Result<String, String>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(env)))
        .unwrap_or_else(|payload| Err(format!("native call panicked: {}", panic_message(&*payload))))
        .and_then(|response| env.new_string(response).map_err(|e| e.to_string()));

    match outcome {
        Ok(response) => response.into_raw(),
        Err(message) => {
            // If throwing fails too there is already a pending exception.
            let _ = env.throw_new(EXCEPTION_CLASS, message);
            ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_mathoku_core_MathokuCore_greet(
    mut env: JNIEnv,
    _class: JClass,
    name: JString,
) -> jstring {
    respond(&mut env, |env| {
        let input: String = env
            .get_string(&name)
            .map_err(|e| format!("invalid name string: {e}"))?
            .into();
        Ok(greet(&input))
    })
}

#[no_mangle]
pub extern "system" fn Java_com_mathoku_core_MathokuCore_getDummyUserJson(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    respond(&mut env, |_env| get_dummy_user_json().map_err(|e| e.to_string()))
}
