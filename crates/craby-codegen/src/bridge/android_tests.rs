use super::android::{cmake_lists, jni_symbol, on_load, package_kt};
use super::ios::provider_source;
use crate::test_utils::{CALCULATOR, STORAGE, context};

#[test]
fn jni_symbol_escapes_underscores() {
    assert_eq!(
        jni_symbol("com.example.my_module", "MyModulePackage", "nativeSetDataPath"),
        "Java_com_example_my_1module_MyModulePackage_nativeSetDataPath"
    );
    assert_eq!(
        jni_symbol("dev.craby", "Pkg", "run"),
        "Java_dev_craby_Pkg_run"
    );
}

#[test]
fn on_load_registers_every_module() {
    let out = on_load(&context("/app", &[CALCULATOR, STORAGE]));

    assert!(out.contains("#include <CxxCalculatorModule.hpp>"));
    assert!(out.contains("#include <CxxStorageModule.hpp>"));
    assert!(out.contains("craby::calculator::CxxCalculatorModule::kModuleName,"));
    assert!(out.contains("return std::make_shared<craby::storage::CxxStorageModule>(jsInvoker);"));
    assert!(out.contains(
        "Java_com_example_my_1module_MyModulePackage_nativeSetDataPath(JNIEnv *env, jclass clazz, jstring jDataPath) {"
    ));
    assert!(out.contains("craby::calculator::CxxCalculatorModule::dataPath = dataPath;"));
    assert!(out.contains("craby::storage::CxxStorageModule::dataPath = dataPath;"));
}

#[test]
fn cmake_links_the_prebuilt_library() {
    let out = cmake_lists(&context("/app", &[CALCULATOR]));

    assert!(out.contains("project(craby-my-module)"));
    assert!(out.contains("${CMAKE_SOURCE_DIR}/libs/${ANDROID_ABI}/libmy_module-prebuilt.a"));
    assert!(out.contains("add_library(cxx-my-module SHARED"));
    assert!(out.contains("${CMAKE_SOURCE_DIR}/src/calculator_bridge.rs.cc"));
    assert!(out.contains("${CPP_DIR}/CxxCalculatorModule.cpp"));
}

#[test]
fn package_lists_prepare_names() {
    let out = package_kt(&context("/app", &[CALCULATOR, STORAGE]));

    assert!(out.starts_with("package com.example.my_module\n"));
    assert!(out.contains("class MyModulePackage : BaseReactPackage() {"));
    assert!(out.contains("\"__crabyCalculator_JNI_prepare__\","));
    assert!(out.contains("\"__crabyStorage_JNI_prepare__\""));
    assert!(out.contains("SoLoader.loadLibrary(\"cxx-my-module\")"));
    assert!(out.contains("nativeSetDataPath(reactContext.filesDir.absolutePath)"));
    assert!(out.contains("return null"));
}

#[test]
fn ios_provider_sets_data_path() {
    let out = provider_source(&context("/app", &[CALCULATOR]));

    assert!(out.contains("#import \"CxxCalculatorModule.hpp\""));
    assert!(out.contains("@implementation MyModuleModuleProvider"));
    assert!(out.contains("craby::calculator::CxxCalculatorModule::dataPath = dataPath;"));
    assert!(out.contains("objectForInfoDictionaryKey:@\"AppGroupID\""));
    assert!(out.contains("NSSearchPathForDirectoriesInDomains(NSDocumentDirectory"));
    assert!(!out.contains("JNI_prepare"));
}
