//! iOS registration: an Objective-C++ provider that sets the data path and registers
//! every module at load time. iOS needs no bootstrap handshake.

use craby_core::naming::to_pascal_case;
use indoc::formatdoc;

use crate::codegen::{CodegenContext, GeneratedFile, indent};

pub(crate) fn provider_class(ctx: &CodegenContext) -> String {
    format!("{}ModuleProvider", to_pascal_case(&ctx.project_name))
}

pub(super) fn module_provider(ctx: &CodegenContext) -> GeneratedFile {
    let path = ctx
        .layout
        .ios_src_dir()
        .join(format!("{}.mm", provider_class(ctx)));
    let content = format!(
        "{}\n{}",
        ctx.header("//", ctx.project_hash()),
        provider_source(ctx)
    );
    GeneratedFile::generated(path, content)
}

pub(crate) fn provider_source(ctx: &CodegenContext) -> String {
    let mut imports = Vec::new();
    let mut prepares = Vec::new();
    let mut registers = Vec::new();
    for module in ctx.modules() {
        let class = format!("{}::{}", module.names.cxx_namespace(), module.names.cxx_class());
        imports.push(format!("#import \"{}.hpp\"", module.names.cxx_class()));
        prepares.push(format!("{class}::dataPath = dataPath;"));
        registers.push(formatdoc! {"
            facebook::react::registerCxxModuleToGlobalModuleMap(
                {class}::kModuleName,
                [](std::shared_ptr<facebook::react::CallInvoker> jsInvoker) {{
                  return std::make_shared<{class}>(jsInvoker);
                }});",
            class = class,
        });
    }

    formatdoc! {"
        {imports}
        #import <Foundation/Foundation.h>
        #import <ReactCommon/CxxTurboModuleUtils.h>
        #include <string>

        @interface {provider} : NSObject
        @end

        @implementation {provider}

        + (void)load {{
          const char *cDataPath = [[self getDataPath] UTF8String];
          std::string dataPath(cDataPath);

        {prepares}

        {registers}
        }}

        + (NSString *)getDataPath {{
          NSString *appGroupID = [[NSBundle mainBundle] objectForInfoDictionaryKey:@\"AppGroupID\"];

          if (appGroupID != nil) {{
            NSURL *containerURL = [[NSFileManager defaultManager]
                containerURLForSecurityApplicationGroupIdentifier:appGroupID];
            if (containerURL == nil) {{
              @throw [NSException exceptionWithName:@\"CrabyInitializationException\"
                                             reason:[NSString stringWithFormat:@\"Invalid AppGroup ID: %@\", appGroupID]
                                           userInfo:nil];
            }}
            return [containerURL path];
          }}

          NSArray *paths = NSSearchPathForDirectoriesInDomains(NSDocumentDirectory, NSUserDomainMask, YES);
          return [paths firstObject];
        }}

        @end
        ",
        imports = imports.join("\n"),
        provider = provider_class(ctx),
        prepares = indent(&prepares.join("\n"), 2),
        registers = indent(&registers.join("\n"), 2),
    }
}
